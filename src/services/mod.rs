mod github;
mod medium;
mod youtube;

pub use github::{GitHubClient, RawRepo};
pub use medium::{MediumClient, RawPost};
pub use youtube::{RawVideo, YouTubeClient};
