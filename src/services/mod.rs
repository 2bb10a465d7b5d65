// Services module for the Shutterlist backend
// Business logic layer for the application

pub mod email;
pub mod image_host;
pub mod jwt;
pub mod lead;
pub mod listing;
pub mod photo;
pub mod slug;
pub mod subscription;
pub mod video;
pub mod video_host;

// Re-export commonly used services
pub use email::{EmailError, EmailService};
pub use image_host::{CloudflareImages, ImageHost, ImageHostError, UploadedImage};
pub use jwt::{AccessTokenClaims, JwtConfig, JwtError, JwtService};
pub use lead::{LeadService, NotificationOutcome};
pub use listing::ListingService;
pub use photo::PhotoService;
pub use slug::{generate_slug, uniquify, SlugError, SlugGenerator};
pub use video::{VideoEvent, VideoService, WebhookOutcome};
pub use video_host::{DirectUpload, MuxVideo, VideoHost, VideoHostError};
