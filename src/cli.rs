use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::{Confirm, Input};
use serde_json::{json, Map, Value};

use deezer_resolver::config::{self, Config, LavalinkConfig, PluginOptions};
use deezer_resolver::host::lavalink::LavalinkNode;
use deezer_resolver::host::{OfflineSearch, PlayerManager, SearchDelegate};
use deezer_resolver::models::{Requester, SearchOutcome, SearchQuery};
use deezer_resolver::plugin::DeezerPlugin;
use deezer_resolver::sources::deezer::DeezerCatalog;
use deezer_resolver::sources::HttpTransport;

#[derive(Parser)]
#[command(name = "deezer-resolver", about = "Resolve Deezer links into playable tracks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a Deezer URL or run a plain search through the playback node
    Resolve {
        /// Deezer track/album/playlist URL or search text
        query: String,
        /// Keep at most N album tracks
        #[arg(long)]
        album_limit: Option<u64>,
        /// Keep at most N playlist tracks
        #[arg(long)]
        playlist_limit: Option<u64>,
        /// Bind every track to a playable source right away
        #[arg(long)]
        eager: bool,
        /// Search source for plain text (youtube, youtube music, soundcloud)
        #[arg(long)]
        source: Option<String>,
        /// Requester tag attached to every track
        #[arg(long)]
        requester: Option<String>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit plugin options and the Lavalink connection
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve {
            query,
            album_limit,
            playlist_limit,
            eager,
            source,
            requester,
            json,
        } => {
            let overrides = Overrides {
                album_limit,
                playlist_limit,
                eager,
            };
            cmd_resolve(&query, overrides, source, requester, json)
        }
        Commands::Config => cmd_config(),
    }
}

struct Overrides {
    album_limit: Option<u64>,
    playlist_limit: Option<u64>,
    eager: bool,
}

/// Command line flags win over the `[plugin]` section of the config file.
fn plugin_options(base: &Value, overrides: &Overrides) -> Value {
    let mut options = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    if let Some(limit) = overrides.album_limit {
        options.insert("albumPageLimit".to_string(), json!(limit));
    }
    if let Some(limit) = overrides.playlist_limit {
        options.insert("playlistPageLimit".to_string(), json!(limit));
    }
    if overrides.eager {
        options.insert("eagerResolve".to_string(), Value::Bool(true));
    }
    Value::Object(options)
}

fn host_search(lavalink: &LavalinkConfig) -> Result<Arc<dyn SearchDelegate>> {
    if lavalink.is_configured() {
        Ok(Arc::new(LavalinkNode::new(lavalink)?))
    } else {
        Ok(Arc::new(OfflineSearch))
    }
}

fn cmd_resolve(
    query: &str,
    overrides: Overrides,
    source: Option<String>,
    requester: Option<String>,
    as_json: bool,
) -> Result<()> {
    let cfg = config::load_config();
    let options = PluginOptions::from_value(&plugin_options(&cfg.plugin, &overrides))
        .context("invalid plugin options")?;

    let catalog = DeezerCatalog::with_transport(HttpTransport::new()?, &cfg.catalog.api_base, &options);
    let plugin = DeezerPlugin::with_catalog(options, Arc::new(catalog));

    if plugin.options().eager_resolve && !cfg.lavalink.is_configured() {
        log::warn!("eager resolution without a Lavalink node drops every track; run 'deezer-resolver config'");
    }

    let mut manager = PlayerManager::new(host_search(&cfg.lavalink)?);
    manager.use_plugin(&plugin);

    let query = match source {
        Some(source) => SearchQuery::Structured {
            query: query.to_string(),
            source: Some(source),
        },
        None => SearchQuery::Text(query.to_string()),
    };
    let requester = requester.as_deref().map(Requester::from);

    let outcome = manager.search(&query, requester.as_ref())?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
    } else {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    println!("{}", outcome.load_type);

    if let Some(playlist) = &outcome.playlist {
        println!(
            "{} ({} tracks, {})",
            playlist.name,
            outcome.tracks.len(),
            format_duration(playlist.duration_ms)
        );
    }

    if !outcome.tracks.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["#", "Title", "Artist", "Length", "Resolved"]);
        for (i, track) in outcome.tracks.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(track.title()),
                Cell::new(track.author()),
                Cell::new(format_duration(track.duration_ms())),
                Cell::new(if track.is_resolved() { "yes" } else { "no" }),
            ]);
        }
        println!("{table}");
    }

    if let Some(exception) = &outcome.exception {
        println!("error ({:?}): {}", exception.severity, exception.message);
    }
}

/// Starting point for the config prompts. An invalid `[plugin]` section is reported and replaced.
fn current_options(plugin: &Value) -> PluginOptions {
    PluginOptions::from_value(plugin).unwrap_or_else(|e| {
        log::warn!("ignoring invalid [plugin] section: {}", e);
        PluginOptions::default()
    })
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();
    let current = current_options(&cfg.plugin);

    println!("Plugin options (0 = no limit)\n");

    let album_limit: u64 = Input::new()
        .with_prompt("Album track limit")
        .default(current.album_page_limit.map_or(0, |n| n.get() as u64))
        .interact_text()?;
    let playlist_limit: u64 = Input::new()
        .with_prompt("Playlist track limit")
        .default(current.playlist_page_limit.map_or(0, |n| n.get() as u64))
        .interact_text()?;
    let eager = Confirm::new()
        .with_prompt("Resolve tracks eagerly?")
        .default(current.eager_resolve)
        .interact()?;

    let mut plugin = Map::new();
    if album_limit > 0 {
        plugin.insert("albumPageLimit".to_string(), json!(album_limit));
    }
    if playlist_limit > 0 {
        plugin.insert("playlistPageLimit".to_string(), json!(playlist_limit));
    }
    plugin.insert("eagerResolve".to_string(), Value::Bool(eager));

    println!("\nLavalink node (leave the URL empty to disable)\n");

    let url: String = Input::new()
        .with_prompt("URL")
        .with_initial_text(cfg.lavalink.url.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    let password: String = Input::new()
        .with_prompt("Password")
        .with_initial_text(cfg.lavalink.password.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    if eager && url.is_empty() {
        bail!("eager resolution needs a Lavalink node");
    }

    cfg = Config {
        plugin: Value::Object(plugin),
        catalog: cfg.catalog,
        lavalink: LavalinkConfig {
            url: Some(url).filter(|u| !u.is_empty()),
            password: Some(password).filter(|p| !p.is_empty()),
        },
    };

    config::save_config(&cfg)?;
    println!("\nSaved to {}", config::config_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let base = json!({ "albumPageLimit": 10, "playlistPageLimit": 50 });
        let merged = plugin_options(
            &base,
            &Overrides {
                album_limit: Some(2),
                playlist_limit: None,
                eager: true,
            },
        );
        assert_eq!(
            merged,
            json!({ "albumPageLimit": 2, "playlistPageLimit": 50, "eagerResolve": true })
        );
        assert_eq!(
            plugin_options(&Value::Null, &Overrides { album_limit: None, playlist_limit: None, eager: false }),
            json!({})
        );
    }

    #[test]
    fn test_invalid_plugin_section_falls_back_to_defaults() {
        let options = current_options(&json!({ "albumPageLimit": "ten", "eagerResolve": true }));
        assert_eq!(options, PluginOptions::default());

        let options = current_options(&json!({ "albumPageLimit": 4 }));
        assert_eq!(options.album_page_limit.map(|n| n.get()), Some(4));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(215_000), "3:35");
        assert_eq!(format_duration(3_723_000), "1:02:03");
        assert_eq!(format_duration(0), "0:00");
    }
}
