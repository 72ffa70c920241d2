// file: src/remote/mod.rs
// description: HTTP access to the repository host module exports
// reference: https://docs.rs/reqwest

pub mod fetcher;
pub mod tree;

pub use fetcher::{ArchiveFetcher, FetchedArchive};
pub use tree::TreeLister;

use crate::config::RemoteConfig;
use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

pub(crate) fn build_client(config: &RemoteConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}
