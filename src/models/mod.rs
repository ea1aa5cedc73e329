// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    FederalState, Gender, LookingFor, NewProfile, NewProfileImage, Profile, ProfileImage,
    ScoringWeights,
};
pub use requests::{AddImageRequest, CreateProfileRequest};
pub use responses::{
    CitySuggestion, ErrorResponse, HealthResponse, ProfileDetailResponse, ProfileListItem,
    RunMatchingResponse,
};
