//! Council Whitelist Tool
//!
//! Offline companion to the whitelist service: hashes identities, prints the
//! roster root, exports and checks membership proofs, and writes JSON test
//! vectors for front-end and contract tests.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use council_whitelist::{
    hash_identity, keccak_hex, MembershipProofBundle, MembershipProver, WhitelistConfig,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "whitelist")]
#[command(about = "Council whitelist roots, proofs and test vectors")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Keccak digest and leaf hash of an identity
    Hash { identity: String },

    /// Print the root of a roster
    Root {
        /// Whitelist configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Check whether an identity is on a roster
    Check {
        #[arg(short, long)]
        config: PathBuf,
        identity: String,
    },

    /// Export a membership proof as JSON
    Prove {
        #[arg(short, long)]
        config: PathBuf,
        identity: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a proof bundle, against a roster's root if one is given
    Verify {
        #[arg(short, long)]
        bundle: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate test vectors for a roster
    Vectors {
        #[arg(short, long)]
        config: PathBuf,
        /// Output directory for test vectors
        #[arg(short, long, default_value = "test-vectors")]
        output: PathBuf,
    },
}

/// Test vector file format
#[derive(Debug, Serialize)]
struct TestVectorFile {
    /// Leaf construction, for readers implementing a verifier elsewhere
    leaf_pipeline: &'static str,
    /// Roster root
    root: String,
    /// Roster in tree order
    members: Vec<String>,
    /// Valid claims, one per member
    claims: Vec<MembershipProofBundle>,
    /// Claims that must fail verification against `root`
    invalid_claims: Vec<InvalidTestClaim>,
}

/// An invalid claim for negative testing
#[derive(Debug, Serialize)]
struct InvalidTestClaim {
    description: String,
    bundle: MembershipProofBundle,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Hash { identity } => {
            println!("keccak256: {}", keccak_hex(&identity));
            println!("leaf:      {}", hex::encode(hash_identity(&identity)));
        }
        Command::Root { config } => {
            let prover = load_prover(&config)?;
            println!("{}", prover.root_hex());
        }
        Command::Check { config, identity } => {
            let prover = load_prover(&config)?;
            let is_member = prover.is_member(&identity);
            println!(
                "{}",
                serde_json::json!({ "identity": identity, "is_member": is_member })
            );
        }
        Command::Prove {
            config,
            identity,
            output,
        } => {
            let prover = load_prover(&config)?;
            let Some(bundle) = prover.prove(&identity) else {
                bail!("{identity} is not on the whitelist");
            };
            let json = serde_json::to_string_pretty(&bundle)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), "Wrote proof");
                }
                None => println!("{json}"),
            }
        }
        Command::Verify { bundle, config } => {
            let json = std::fs::read_to_string(&bundle)
                .with_context(|| format!("reading {}", bundle.display()))?;
            let bundle: MembershipProofBundle = serde_json::from_str(&json)?;

            let valid = match config {
                Some(config) => load_prover(&config)?.verify_bundle(&bundle),
                None => bundle.verify(),
            };
            if !valid {
                bail!("proof for {} is invalid", bundle.identity);
            }
            println!("proof for {} is valid", bundle.identity);
        }
        Command::Vectors { config, output } => {
            let prover = load_prover(&config)?;

            // Ensure output directory exists
            std::fs::create_dir_all(&output)?;

            let vectors = build_vectors(&prover);
            let output_path = output.join("whitelist_vectors.json");
            std::fs::write(&output_path, serde_json::to_string_pretty(&vectors)?)?;

            tracing::info!(
                path = %output_path.display(),
                claims = vectors.claims.len(),
                invalid_claims = vectors.invalid_claims.len(),
                "Wrote test vectors"
            );
        }
    }

    Ok(())
}

fn load_prover(path: &Path) -> Result<MembershipProver> {
    let config =
        WhitelistConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(MembershipProver::from_config(config)?)
}

/// Identity guaranteed not to be on `prover`'s roster.
fn outsider(prover: &MembershipProver) -> String {
    let mut candidate = "mallory.testnet".to_string();
    while prover.members().contains(&candidate) {
        candidate.insert(0, 'x');
    }
    candidate
}

fn build_vectors(prover: &MembershipProver) -> TestVectorFile {
    let members = prover.members().members().to_vec();
    let claims: Vec<MembershipProofBundle> = members
        .iter()
        .filter_map(|member| prover.prove(member))
        .collect();

    let mut invalid_claims = Vec::new();
    let first = &claims[0];
    let outsider = outsider(prover);

    invalid_claims.push(InvalidTestClaim {
        description: format!("{outsider} reusing the proof of {}", first.identity),
        bundle: MembershipProofBundle {
            identity: outsider.clone(),
            leaf: hash_identity(&outsider),
            ..first.clone()
        },
    });

    invalid_claims.push(InvalidTestClaim {
        description: format!("{outsider} claiming the leaf of {}", first.identity),
        bundle: MembershipProofBundle {
            identity: outsider,
            ..first.clone()
        },
    });

    let mut tampered = first.clone();
    if let Some(step) = tampered.proof.steps.first_mut() {
        step.sibling[0] ^= 0xff;
    }
    invalid_claims.push(InvalidTestClaim {
        description: format!("{} with a tampered sibling", first.identity),
        bundle: tampered,
    });

    let mut truncated = first.clone();
    truncated.proof.steps.pop();
    invalid_claims.push(InvalidTestClaim {
        description: format!("{} with the top proof step removed", first.identity),
        bundle: truncated,
    });

    TestVectorFile {
        leaf_pipeline: "sha256(hex(keccak256(identity)))",
        root: prover.root_hex(),
        members,
        claims,
        invalid_claims,
    }
}
