//! `linkpanel serve` – run the metadata endpoint.

use anyhow::Result;
use linkpanel_core::config::LinkPanelConfig;
use linkpanel_core::server;

pub async fn run_serve(cfg: &LinkPanelConfig, bind: Option<&str>) -> Result<()> {
    let addr = bind.unwrap_or(cfg.bind_addr.as_str());
    println!("Serving {} on http://{}", cfg.metadata_path(), addr);
    server::serve(cfg, bind).await
}
