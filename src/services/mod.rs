// Service exports
pub mod cache;
pub mod geocoder;
pub mod mailer;
pub mod media;
pub mod postgres;
pub mod report;
pub mod runner;
pub mod scheduler;

pub use cache::{CacheError, CacheKey, ResponseCache};
pub use geocoder::{GeocoderClient, GeocoderError};
pub use mailer::{MailError, Mailer};
pub use media::{HostedImage, MediaClient, MediaError};
pub use postgres::{PostgresError, ProfileRepository};
pub use report::ReportDispatcher;
pub use runner::{MatchRunner, RunError, RunSummary};
