use console::style;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use skr_server::{ServerConfig, site};
use skr_store::{OciLayoutStore, default_store_root};

use super::HttpAction;

pub(super) async fn cmd_http(action: HttpAction) -> skr_core::Result<()> {
    match action {
        HttpAction::Serve {
            port,
            oci_path,
            cors,
            fetch_timeout,
        } => {
            let store = OciLayoutStore::open(default_store_root(oci_path.as_deref()));
            println!(
                "Serving Skills Registry (HTTP) at {}",
                style(format!("http://localhost:{port}")).cyan()
            );
            println!("Source: {}", store.root().display());
            println!("Press Ctrl+C to stop");

            let config = ServerConfig {
                listen: format!("0.0.0.0:{port}"),
                cors,
                fetch_timeout: Duration::from_secs(fetch_timeout),
                ..Default::default()
            };
            skr_server::start_server(config, Arc::new(store)).await
        }
        HttpAction::Generate {
            output,
            oci_path,
            fetch_timeout,
        } => {
            let store = OciLayoutStore::open(default_store_root(oci_path.as_deref()));
            let generated =
                site::generate_site(&store, &output, Duration::from_secs(fetch_timeout)).await?;

            for skipped in &generated.skipped {
                warn!(tag = %skipped.item, reason = %skipped.reason, "tag left out of skills.json");
            }
            println!(
                "Generated {} skills into {}",
                generated.skills,
                style(output.display()).bold()
            );
            Ok(())
        }
    }
}
