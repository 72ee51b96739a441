//! Peer directory endpoint.

use super::Client;
use crate::error::Result;
use crate::model::User;

impl Client {
    /// Lists the peers the local account may talk to.
    pub(super) async fn peers(&self) -> Result<Vec<User>> {
        let url = self.url(&self.config.peer_directory_path, None)?;
        let peers: Vec<User> = self.execute(self.http.get(url.clone()), &url).await?;
        tracing::debug!(count = peers.len(), "loaded peer directory");
        Ok(peers)
    }
}
