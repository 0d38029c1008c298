//! # splitdns
//!
//! Command line front end for the custom DNS resolver stage: validates a
//! configuration file and answers single queries against it.

mod bootstrap;

use anyhow::Context;
use bootstrap::{init_logging, load_config, log_loaded};
use clap::{Parser, Subcommand};
use hickory_proto::op::Message;
use splitdns_application::ports::DnsResolver;
use splitdns_domain::{CliOverrides, Config, DnsQuery, DnsRequest, RecordType};
use splitdns_infrastructure::dns::forwarding::MessageBuilder;
use splitdns_infrastructure::dns::{NoUpstreamResolver, ResolverBuilder};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "splitdns")]
#[command(version)]
#[command(about = "Answers DNS queries from locally configured records, per client group")]
struct Cli {
    /// Override `[logging] level`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, validate and compile a configuration file
    Check {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Resolve one query against the configured records
    Resolve {
        #[arg(short, long)]
        config: Option<String>,

        /// Address of the requesting client
        #[arg(long)]
        client_ip: Option<IpAddr>,

        /// Host name of the requesting client
        #[arg(long)]
        client_name: Option<String>,

        /// Query name
        name: String,

        /// Query type
        #[arg(default_value = "A")]
        record_type: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        log_level: cli.log_level,
    };

    match cli.command {
        Command::Check { config: path } => {
            let config = load_config(path.as_deref(), overrides)?;
            init_logging(&config);
            log_loaded(path.as_deref(), &config);
            check(&config)
        }
        Command::Resolve {
            config: path,
            client_ip,
            client_name,
            name,
            record_type,
        } => {
            let config = load_config(path.as_deref(), overrides)?;
            init_logging(&config);
            log_loaded(path.as_deref(), &config);

            let record_type: RecordType = record_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let mut request = DnsRequest::new(DnsQuery::new(name.as_str(), record_type));
            if let Some(ip) = client_ip {
                request = request.with_client_ip(ip);
            }
            if let Some(client_name) = client_name {
                request = request.with_client_name(client_name);
            }

            resolve(&config, &request).await
        }
    }
}

fn check(config: &Config) -> anyhow::Result<()> {
    if !config.custom_dns.is_enabled() {
        info!("Custom DNS is not configured");
        println!("configuration OK (custom DNS disabled)");
        return Ok(());
    }

    config.custom_dns.log_config();
    let compiled = config
        .compile_custom_dns()
        .context("compiling custom DNS records")?;

    let mode = if compiled.is_legacy() { "legacy" } else { "client groups" };
    println!(
        "configuration OK ({} group(s), {} mode, ttl {}s)",
        compiled.groups().len(),
        mode,
        compiled.ttl
    );
    Ok(())
}

async fn resolve(config: &Config, request: &DnsRequest) -> anyhow::Result<()> {
    let resolver = ResolverBuilder::new(Arc::new(NoUpstreamResolver))
        .with_custom_dns(&config.custom_dns, config.base_dir())?
        .build();

    info!(
        domain = %request.query.domain,
        record_type = %request.query.record_type,
        client_ip = ?request.client_ip,
        client_name = ?request.client_name,
        resolver = resolver.name(),
        "Resolving"
    );

    let cancel = CancellationToken::new();
    let response = resolver.resolve(request, &cancel).await?;

    let id = (std::process::id() & 0xFFFF) as u16;
    let query = MessageBuilder::build_query(id, &request.query.domain, &request.query.record_type)?;
    let reply = MessageBuilder::build_response(&query, &response)?;
    let size = MessageBuilder::serialize(&reply)?.len();

    print_reply(&reply, response.reason.as_ref(), size);
    Ok(())
}

fn print_reply(reply: &Message, reason: &str, size: usize) {
    let mut flags = vec!["qr"];
    if reply.authoritative() {
        flags.push("aa");
    }
    if reply.recursion_desired() {
        flags.push("rd");
    }
    if reply.recursion_available() {
        flags.push("ra");
    }

    println!(
        ";; ->>HEADER<<- opcode: QUERY, status: {:?}, id: {}",
        reply.response_code(),
        reply.id()
    );
    println!(
        ";; flags: {}; QUERY: {}, ANSWER: {}",
        flags.join(" "),
        reply.queries().len(),
        reply.answers().len()
    );
    println!();
    println!(";; QUESTION SECTION:");
    for query in reply.queries() {
        println!(";{}\t\tIN\t{}", query.name(), query.query_type());
    }
    println!();
    println!(";; ANSWER SECTION:");
    for record in reply.answers() {
        println!("{}", record);
    }
    println!();
    println!(";; ANSWERED BY: {}", reason);
    println!(";; MSG SIZE: {}", size);
}
