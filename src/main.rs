// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! routedesk CLI entrypoint.
//!
//! By default this opens the planning board against the routing backend at `--api-url`
//! (or `ROUTEDESK_API_URL`, default `http://localhost:8080`). `--snapshot` and `--demo` edit a local
//! snapshot file or the built-in demo day instead. `--list-routes`, `--optimize` and `--reprocess`
//! are one-shot backend commands.

use std::error::Error;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use routedesk::api::{ApiClient, ApiError, SaveTarget, DEFAULT_API_URL};
use routedesk::model::{OrderFilter, RouteId};
use routedesk::planner::Planner;
use routedesk::store::{MemoryStore, Snapshot, SnapshotFile, WriteDurability};
use routedesk::tui::{self, Collaborators};
use tracing_subscriber::EnvFilter;

const API_URL_ENV: &str = "ROUTEDESK_API_URL";
const LOG_ENV: &str = "ROUTEDESK_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--api-url <url>] [--route <id>] [--status <status>]\n  {program} --snapshot <file> [--durable-writes]\n  {program} --demo\n  {program} --list-routes [--api-url <url>]\n  {program} --optimize [--api-url <url>]\n  {program} --reprocess <id> [--api-url <url>]\n\nAll modes accept --log-file <path>.\n\nThe board loads orders and vehicles from the backend (--api-url, else ${API_URL_ENV}, else {DEFAULT_API_URL}).\n--route <id> starts from that route's solution and saves back to it; otherwise the first save creates a new route.\n--status only loads orders with that status.\n\n--snapshot edits a local JSON snapshot {{orders, vehicles, solution}}; saves rewrite its solution.\n--durable-writes opts into slower, best-effort durable snapshot writes (fsync where supported).\n--demo edits a built-in demo day in memory.\n\nLog level comes from ${LOG_ENV} (default info). The board logs only to --log-file."
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Board,
    Snapshot,
    Demo,
    ListRoutes,
    Optimize,
    Reprocess(RouteId),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    api_url: Option<String>,
    route: Option<RouteId>,
    status: Option<String>,
    snapshot: Option<String>,
    durable_writes: bool,
    demo: bool,
    list_routes: bool,
    optimize: bool,
    reprocess: Option<RouteId>,
    log_file: Option<String>,
}

impl CliOptions {
    fn mode(&self) -> Mode {
        if self.snapshot.is_some() {
            Mode::Snapshot
        } else if self.demo {
            Mode::Demo
        } else if self.list_routes {
            Mode::ListRoutes
        } else if self.optimize {
            Mode::Optimize
        } else if let Some(route_id) = self.reprocess {
            Mode::Reprocess(route_id)
        } else {
            Mode::Board
        }
    }

    fn interactive(&self) -> bool {
        matches!(self.mode(), Mode::Board | Mode::Snapshot | Mode::Demo)
    }

    /// Flag, then environment, then the default.
    fn api_url(&self) -> String {
        self.api_url
            .clone()
            .or_else(|| std::env::var(API_URL_ENV).ok().filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
    }
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api-url" => {
                if options.api_url.is_some() {
                    return Err(());
                }
                options.api_url = Some(args.next().ok_or(())?);
            }
            "--route" => {
                if options.route.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.route = Some(raw.parse().map_err(|_| ())?);
            }
            "--status" => {
                if options.status.is_some() {
                    return Err(());
                }
                options.status = Some(args.next().ok_or(())?);
            }
            "--snapshot" => {
                if options.snapshot.is_some() {
                    return Err(());
                }
                options.snapshot = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--list-routes" => {
                if options.list_routes {
                    return Err(());
                }
                options.list_routes = true;
            }
            "--optimize" => {
                if options.optimize {
                    return Err(());
                }
                options.optimize = true;
            }
            "--reprocess" => {
                if options.reprocess.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.reprocess = Some(raw.parse().map_err(|_| ())?);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(args.next().ok_or(())?);
            }
            _ => return Err(()),
        }
    }

    let modes = [
        options.snapshot.is_some(),
        options.demo,
        options.list_routes,
        options.optimize,
        options.reprocess.is_some(),
    ];
    if modes.iter().filter(|set| **set).count() > 1 {
        return Err(());
    }

    let mode = options.mode();
    let backend_flags = options.route.is_some() || options.status.is_some();
    if backend_flags && mode != Mode::Board {
        return Err(());
    }
    if options.api_url.is_some() && matches!(mode, Mode::Snapshot | Mode::Demo) {
        return Err(());
    }
    if options.durable_writes && mode != Mode::Snapshot {
        return Err(());
    }

    Ok(options)
}

/// Installs the global subscriber. The board owns the terminal, so without `--log-file` it logs
/// nowhere; one-shot commands log to stderr.
fn init_logging(options: &CliOptions) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    match &options.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if options.interactive() => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn run_board(
    runtime: &tokio::runtime::Runtime,
    planner: Planner,
    collaborators: Collaborators,
) -> Result<(), Box<dyn Error>> {
    let handle = runtime.handle().clone();
    runtime.block_on(async move {
        tokio::task::spawn_blocking(move || tui::run(planner, collaborators, handle)).await
    })??;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "routedesk".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(&options)?;
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        match options.mode() {
            Mode::ListRoutes => {
                let client = ApiClient::new(&options.api_url())?;
                let routes = runtime.block_on(client.list_routes())?;
                for route in &routes {
                    println!(
                        "{}\t{}\t{} stops\t{}",
                        route.id,
                        route.status,
                        route.stop_count(),
                        route.created_at
                    );
                }
            }
            Mode::Optimize => {
                let client = ApiClient::new(&options.api_url())?;
                println!("{}", runtime.block_on(client.trigger_optimization())?);
            }
            Mode::Reprocess(route_id) => {
                let client = ApiClient::new(&options.api_url())?;
                println!("{}", runtime.block_on(client.reprocess_route(route_id))?);
            }
            Mode::Demo => {
                let store = Arc::new(MemoryStore::new(Snapshot::demo()));
                let snapshot = store.snapshot();
                let planner =
                    Planner::new(snapshot.orders, snapshot.vehicles, snapshot.solution.as_ref());
                let collaborators = Collaborators {
                    label: "demo".to_owned(),
                    orders: store.clone(),
                    sink: store,
                    filter: OrderFilter::default(),
                    target: SaveTarget::NewRoute,
                };
                run_board(&runtime, planner, collaborators)?;
            }
            Mode::Snapshot => {
                let path = options.snapshot.clone().unwrap_or_default();
                let durability = if options.durable_writes {
                    WriteDurability::Durable
                } else {
                    WriteDurability::BestEffort
                };
                let file = Arc::new(SnapshotFile::new(&path).with_durability(durability));
                let snapshot = file.load()?;
                tracing::info!(
                    path = %file.path().display(),
                    orders = snapshot.orders.len(),
                    vehicles = snapshot.vehicles.len(),
                    "snapshot loaded"
                );
                let planner =
                    Planner::new(snapshot.orders, snapshot.vehicles, snapshot.solution.as_ref());
                let collaborators = Collaborators {
                    label: path,
                    orders: file.clone(),
                    sink: file,
                    filter: OrderFilter::default(),
                    target: SaveTarget::NewRoute,
                };
                run_board(&runtime, planner, collaborators)?;
            }
            Mode::Board => {
                let client = Arc::new(ApiClient::new(&options.api_url())?);
                let filter = OrderFilter { status: options.status.clone(), route_id: None };
                let (orders, vehicles, initial) = runtime.block_on(async {
                    let orders = client.get_orders(&filter).await?;
                    let vehicles = client.get_vehicles().await?;
                    let initial = match options.route {
                        Some(route_id) => client.get_route(route_id).await?.solution_json,
                        None => None,
                    };
                    Ok::<_, ApiError>((orders, vehicles, initial))
                })?;
                tracing::info!(
                    orders = orders.len(),
                    vehicles = vehicles.len(),
                    route = ?options.route,
                    "board loaded from backend"
                );
                let planner = Planner::new(orders, vehicles, initial.as_ref());
                let collaborators = Collaborators {
                    label: client.base_url().to_string(),
                    orders: client.clone(),
                    sink: client,
                    filter,
                    target: options.route.map_or(SaveTarget::NewRoute, SaveTarget::Route),
                };
                run_board(&runtime, planner, collaborators)?;
            }
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("routedesk: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions, Mode};
    use routedesk::model::RouteId;

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args_as_board() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.mode(), Mode::Board);
        assert!(options.interactive());
    }

    #[test]
    fn parses_board_flags() {
        let options = parse(&["--api-url", "http://backend:9000", "--route", "12", "--status", "pending"])
            .expect("parse options");
        assert_eq!(options.api_url.as_deref(), Some("http://backend:9000"));
        assert_eq!(options.route, Some(RouteId::new(12).expect("route id")));
        assert_eq!(options.status.as_deref(), Some("pending"));
        assert_eq!(options.mode(), Mode::Board);
    }

    #[test]
    fn explicit_api_url_wins() {
        let options = parse(&["--api-url", "http://backend:9000"]).expect("parse options");
        assert_eq!(options.api_url(), "http://backend:9000");
    }

    #[test]
    fn parses_snapshot_with_durable_writes() {
        let options =
            parse(&["--snapshot", "day.json", "--durable-writes"]).expect("parse options");
        assert_eq!(options.snapshot.as_deref(), Some("day.json"));
        assert!(options.durable_writes);
        assert_eq!(options.mode(), Mode::Snapshot);
    }

    #[test]
    fn parses_one_shot_commands() {
        assert_eq!(parse(&["--list-routes"]).expect("parse").mode(), Mode::ListRoutes);
        assert_eq!(parse(&["--optimize"]).expect("parse").mode(), Mode::Optimize);
        let options = parse(&["--reprocess", "7", "--log-file", "out.log"]).expect("parse");
        assert_eq!(options.mode(), Mode::Reprocess(RouteId::new(7).expect("route id")));
        assert_eq!(options.log_file.as_deref(), Some("out.log"));
        assert!(!options.interactive());
    }

    #[test]
    fn parses_demo_with_log_file() {
        let options = parse(&["--log-file", "board.log", "--demo"]).expect("parse options");
        assert_eq!(options.mode(), Mode::Demo);
        assert!(options.interactive());
    }

    #[test]
    fn rejects_conflicting_modes() {
        parse(&["--demo", "--snapshot", "day.json"]).unwrap_err();
        parse(&["--optimize", "--list-routes"]).unwrap_err();
        parse(&["--reprocess", "3", "--demo"]).unwrap_err();
    }

    #[test]
    fn rejects_flags_outside_their_mode() {
        parse(&["--demo", "--route", "3"]).unwrap_err();
        parse(&["--optimize", "--status", "pending"]).unwrap_err();
        parse(&["--snapshot", "day.json", "--api-url", "http://x"]).unwrap_err();
        parse(&["--durable-writes"]).unwrap_err();
    }

    #[test]
    fn rejects_bad_ids() {
        parse(&["--route", "abc"]).unwrap_err();
        parse(&["--route", "0"]).unwrap_err();
        parse(&["--reprocess", "-4"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_duplicate_args() {
        parse(&["--nope"]).unwrap_err();
        parse(&["positional"]).unwrap_err();
        parse(&["--demo", "--demo"]).unwrap_err();
        parse(&["--status", "a", "--status", "b"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse(&["--api-url"]).unwrap_err();
        parse(&["--snapshot"]).unwrap_err();
        parse(&["--reprocess"]).unwrap_err();
    }
}
