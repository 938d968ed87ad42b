/*
 * aurpc - Typed client for the Arch User Repository RPC interface.
 * Copyright (C) 2025  compiledkernel-idk and pacboost contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use console::style;

use aurpc::aur::editor::SetHeader;
use aurpc::aur::package::AUR_WEB_ROOT;
use aurpc::{AurClient, AurClientBuilder, AurError, AurRpc, Config, Package, SearchBy};

mod logging;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n",
    "License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>\n\n",
    "This is free software; you are free to change and redistribute it.\n",
    "There is NO WARRANTY, to the extent permitted by law."
);

#[derive(Parser)]
#[command(name = "aurpc")]
#[command(version = VERSION)]
#[command(long_version = LONG_VERSION)]
#[command(about = "Query the Arch User Repository RPC interface.")]
struct Cli {
    /// Print raw package records as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Override the RPC endpoint
    #[arg(long, global = true, value_name = "URL")]
    rpc_url: Option<String>,
    /// Extra request header, 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header", global = true, value_name = "HEADER")]
    headers: Vec<String>,
    /// Log RPC traffic to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search packages
    Search {
        /// name, name-desc, maintainer, depends, makedepends, optdepends, checkdepends
        #[arg(short, long)]
        by: Option<SearchBy>,
        query: String,
    },
    /// Show detailed information on packages
    Info {
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// List packages without a maintainer
    Orphans,
}

fn build_client(cli: &Cli, config: &Config) -> Result<AurClient> {
    let mut config = config.clone();
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = url.clone();
    }
    config.validate()?;

    let mut builder = AurClientBuilder::from_config(&config)?;
    for header in &cli.headers {
        let editor = SetHeader::parse(header)
            .map_err(|e| anyhow!("invalid header '{}': {}", header, e))?;
        builder = builder.request_editor(editor);
    }

    builder.build().context("failed to create AUR client")
}

fn print_search(query: &str, results: &[Package]) {
    if results.is_empty() {
        println!("   No results found for '{}'", style(query).yellow());
        return;
    }

    println!(
        "{} {} result(s) for '{}':",
        style("::").cyan().bold(),
        style(results.len()).white().bold(),
        style(query).yellow()
    );
    println!();

    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(vec!["package", "version", "votes", "popularity", "maintainer"]);
    for pkg in results {
        let mut version = pkg.version.clone();
        if pkg.is_out_of_date() {
            version.push_str(" [out-of-date]");
        }
        t.add_row(vec![
            pkg.name.clone(),
            version,
            pkg.num_votes.to_string(),
            format!("{:.2}", pkg.popularity),
            pkg.maintainer.clone().unwrap_or_else(|| "orphan".to_string()),
        ]);
    }
    println!("{}", t);
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("  ")
    }
}

fn print_info(pkg: &Package) {
    let date = |ts: Option<chrono::DateTime<chrono::Utc>>| {
        ts.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!("{}", style(format!("Package: {}", pkg.name)).bold().cyan());
    println!("  Package Base  : {}", pkg.package_base);
    println!("  Version       : {}", pkg.version);
    println!("  Description   : {}", pkg.description);
    println!("  URL           : {}", pkg.url);
    println!("  AUR Snapshot  : {}", pkg.snapshot_url(AUR_WEB_ROOT));
    println!("  Licenses      : {}", list(&pkg.license));
    println!("  Groups        : {}", list(&pkg.groups));
    println!("  Provides      : {}", list(&pkg.provides));
    println!("  Depends On    : {}", list(&pkg.depends));
    println!("  Make Deps     : {}", list(&pkg.make_depends));
    println!("  Check Deps    : {}", list(&pkg.check_depends));
    println!("  Optional Deps : {}", list(&pkg.opt_depends));
    println!("  Conflicts With: {}", list(&pkg.conflicts));
    println!("  Replaces      : {}", list(&pkg.replaces));
    println!("  Keywords      : {}", list(&pkg.keywords));
    println!("  Maintainer    : {}", pkg.maintainer.as_deref().unwrap_or("None"));
    println!("  Votes         : {}", pkg.num_votes);
    println!("  Popularity    : {:.6}", pkg.popularity);
    println!("  First Submitted: {}", date(pkg.first_submitted_at()));
    println!("  Last Modified : {}", date(pkg.last_modified_at()));
    if pkg.is_out_of_date() {
        println!("  Out-of-date   : {}", style(date(pkg.out_of_date_at())).red());
    }
    println!();
}

fn print_json(results: &[Package]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let client = build_client(&cli, &config)?;

    match &cli.command {
        Command::Search { by, query } => {
            let results = client.search(query, by.unwrap_or_default()).await?;
            if cli.json {
                return print_json(&results);
            }
            print_search(query, &results);
        }
        Command::Info { targets } => {
            let results = client.info(targets).await?;
            if cli.json {
                return print_json(&results);
            }
            for target in targets {
                if !results.iter().any(|p| &p.name == target) {
                    eprintln!("{} package '{}' not found", style("error:").red().bold(), target);
                }
            }
            for pkg in &results {
                print_info(pkg);
            }
        }
        Command::Orphans => {
            let results = client.orphans().await?;
            if cli.json {
                return print_json(&results);
            }
            print_search("orphans", &results);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    logging::init_with_file(
        &config.logging.level,
        cli.verbose,
        config.logging.file.as_deref(),
    );

    if let Err(e) = run(cli, config).await {
        if let Some(aur_err) = e.downcast_ref::<AurError>() {
            if aur_err.is_retryable() {
                eprintln!("{} {} (try again later)", style("error:").red().bold(), aur_err);
                std::process::exit(2);
            }
        }
        return Err(e);
    }

    Ok(())
}
