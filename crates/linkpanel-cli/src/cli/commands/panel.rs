//! `linkpanel panel [app]` – render the panel and drive it from stdin.
//!
//! Commands, one per line: `r` refresh, `e` expand/collapse, `a <app>`
//! switch application, `q` quit.

use anyhow::{Context, Result};
use chrono::Utc;
use linkpanel_core::config::LinkPanelConfig;
use linkpanel_core::panel::{LocalSource, MetadataSource, PanelDriver, ProxySource, Theme};
use linkpanel_core::registry::{register_panel, InMemoryRegistry};
use linkpanel_core::resolver::MetadataResolver;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PanelCommand {
    Refresh,
    ToggleExpand,
    ChangeApp(Option<String>),
    Quit,
}

pub(crate) fn parse_panel_command(line: &str) -> Option<PanelCommand> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match cmd {
        "r" | "refresh" if rest.is_empty() => Some(PanelCommand::Refresh),
        "e" | "expand" if rest.is_empty() => Some(PanelCommand::ToggleExpand),
        "a" | "app" => Some(PanelCommand::ChangeApp(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "q" | "quit" if rest.is_empty() => Some(PanelCommand::Quit),
        _ => None,
    }
}

async fn show(driver: &PanelDriver, theme: &Theme) {
    print!("{}", driver.render(Utc::now(), theme).await);
}

async fn settle_and_show(
    driver: &PanelDriver,
    theme: &Theme,
    handle: JoinHandle<bool>,
) -> Result<()> {
    show(driver, theme).await;
    handle.await.context("panel fetch task")?;
    show(driver, theme).await;
    Ok(())
}

pub async fn run_panel(
    cfg: &LinkPanelConfig,
    app: Option<&str>,
    local: bool,
    expand: bool,
) -> Result<()> {
    let mut registry = InMemoryRegistry::new();
    register_panel(&mut registry, cfg);

    let source: Arc<dyn MetadataSource> = if local {
        Arc::new(LocalSource::new(Arc::new(MetadataResolver::from_config(cfg))))
    } else {
        Arc::new(ProxySource::from_config(cfg))
    };
    let theme = Theme::with_title(cfg.display_name.clone());

    let (driver, first) = PanelDriver::mount(app, source);
    if expand {
        driver.toggle_expand().await;
    }
    settle_and_show(&driver, &theme, first).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_panel_command(&line) {
            Some(PanelCommand::Refresh) => {
                let handle = driver.refresh().await;
                settle_and_show(&driver, &theme, handle).await?;
            }
            Some(PanelCommand::ToggleExpand) => {
                driver.toggle_expand().await;
                show(&driver, &theme).await;
            }
            Some(PanelCommand::ChangeApp(id)) => {
                match driver.identifier_changed(id.as_deref()).await {
                    Some(handle) => settle_and_show(&driver, &theme, handle).await?,
                    None => println!("already showing {}", driver.app_id().await),
                }
            }
            Some(PanelCommand::Quit) => break,
            None => eprintln!("unknown command {:?} (r, e, a <app>, q)", line.trim()),
        }
    }
    Ok(())
}
