// Database models and API shapes

pub mod agent;
pub mod lead;
pub mod listing;
pub mod photo;
pub mod public;
pub mod user;
pub mod video;

pub use agent::{Agent, AgentResponse, NewAgent};
pub use lead::{Lead, LeadResponse, NewLead};
pub use listing::{Listing, ListingGraph, ListingResponse, ListingStatus, NewListing};
pub use photo::{ListingPhoto, NewListingPhoto, PhotoResponse};
pub use public::{PublicAgentResponse, PublicListingResponse, PublicMlsListingResponse};
pub use user::{NewUser, SubscriptionTier, User, UserError, UserResponse};
pub use video::{ListingVideo, NewListingVideo, VideoResponse, VideoStatus};
