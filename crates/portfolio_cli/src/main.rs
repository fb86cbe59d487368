//! CLI entry point for the portfolio data layer.
//!
//! # Responsibility
//! - Load configuration, start logging and load every provider once.
//! - Print a deterministic one-line-per-kind summary, optionally filtered.
//!
//! Usage: `portfolio_cli [filter] [sort] [search]`

use log::error;
use portfolio_core::{
    category_counts, core_version, init_from_config, AppConfig, CollectionQuery, PortfolioApp,
    SortOrder,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();
    if let Err(err) = init_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let app = match PortfolioApp::from_config(&config) {
        Ok(app) => app,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("failed to start: {err}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = build_query(&args);

    let report = app.load_all().await;
    println!("portfolio_core version={}", core_version());
    println!(
        "remote_configured={} persistent_cache={}",
        config.remote.is_configured(),
        config.db_path.is_some()
    );

    let projects = app.projects.items();
    let certificates = app.certificates.items();
    let profile = app.profile.profile();

    println!(
        "projects source={} total={} shown={} categories={:?}",
        report.projects.as_str(),
        projects.len(),
        query.apply(&projects).len(),
        category_counts(&projects)
    );
    println!(
        "certificates source={} total={} shown={}",
        report.certificates.as_str(),
        certificates.len(),
        query.apply(&certificates).len()
    );
    println!(
        "profile source={} name={:?} skills={}",
        report.profile.as_str(),
        profile.name,
        profile.skills.len()
    );
    for (kind, issue) in [
        ("projects", app.projects.last_error()),
        ("certificates", app.certificates.last_error()),
        ("profile", app.profile.last_error()),
    ] {
        if let Some(issue) = issue {
            println!("{kind} last_error={}", issue.kind.as_str());
        }
    }
    for project in query.apply(&projects) {
        println!("  project id={} title={:?}", project.id, project.title);
    }

    app.unmount();
    ExitCode::SUCCESS
}

fn build_query(args: &[String]) -> CollectionQuery {
    let mut query = CollectionQuery::new();
    if let Some(filter) = args.first() {
        query = query.filter(filter);
    }
    if let Some(sort) = args.get(1) {
        match SortOrder::parse(sort) {
            Some(order) => query = query.sort(order),
            None => eprintln!("unknown sort `{sort}`; using newest"),
        }
    }
    if let Some(term) = args.get(2) {
        query = query.search(term.clone());
    }
    query
}
