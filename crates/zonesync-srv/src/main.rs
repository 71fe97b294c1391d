//! zonesyncd - BIND slave-zone provisioning daemon.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    zonesync_srv::run().await
}
