use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dnsproof::DnsProver;
use dnsproof::dns::enums::RecordType;

#[derive(Parser)]
#[command(name = "dnsproof", about = "Prove a DNS record set through its DNSSEC chain of trust")]
struct Args {
    /// Name to resolve and prove
    name: String,

    /// Record type to query
    #[arg(short = 't', long, default_value = "TXT")]
    rtype: RecordType,

    /// DNS-over-HTTPS resolver endpoint
    #[arg(long, default_value = "https://cloudflare-dns.com/dns-query")]
    resolver: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let prover = DnsProver::doh(&args.resolver);

    match prover.query_with_proof(args.rtype, &args.name).await {
        Ok(Some(result)) => {
            for proof in &result.proofs {
                println!("{}", proof);
            }
            println!("{}", result.answer);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("no {} records found at {}", args.rtype, args.name);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("proof failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
