//! dsf: CLI binary for the dialogue-state featurizer.
//!
//! Subcommands:
//! - vocab
//! - encode

mod telemetry;

use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process;

use dsf_core::{validate_config, Config, Domain, OutputKind, State};
use dsf_features::{DenseVector, Encoded, SparseRow, TrackerFeaturizer, FEATURE_SCHEMA_ID};
use serde::Serialize;
use tracing::info;

fn print_help() {
    eprintln!(
        r#"dsf - dialogue-state featurizer CLI

USAGE:
    dsf <COMMAND> [OPTIONS]

COMMANDS:
    vocab               Print the feature layout of an encoder strategy
    encode              Encode dialogue states (NDJSON) into feature rows

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `dsf <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("dsf {}", env!("CARGO_PKG_VERSION"));
}

/// Value following the option at `args[i]`.
fn option_value(args: &[String], i: usize) -> String {
    args.get(i + 1).cloned().unwrap_or_else(|| {
        eprintln!("Missing value for {}", args[i]);
        process::exit(1);
    })
}

/// Parse the domain file, returning it with its raw bytes (for hashing).
fn load_domain(path: &str) -> (Domain, Vec<u8>) {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read domain file: {e}");
        process::exit(1);
    });
    let text = std::str::from_utf8(&bytes).unwrap_or_else(|e| {
        eprintln!("Domain file is not valid UTF-8: {e}");
        process::exit(1);
    });
    let domain = Domain::from_yaml(text).unwrap_or_else(|e| {
        eprintln!("Failed to load domain: {e}");
        process::exit(1);
    });
    (domain, bytes)
}

fn unknown_strategy(name: &str) -> ! {
    eprintln!("Unknown strategy: {name}");
    eprintln!("Known strategies: binary, label_tokenizer, bag_of_words");
    process::exit(1);
}

fn cmd_vocab(args: &[String]) {
    let mut domain_path: Option<String> = None;
    let mut strategy = "binary".to_string();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"dsf vocab

USAGE:
    dsf vocab --domain domain.yaml [--strategy NAME]

OPTIONS:
    --domain PATH       Path to YAML domain (required)
    --strategy NAME     Encoder strategy (default: binary)

Prints one `<index>\t<feature>` line per feature.
"#
                );
                return;
            }
            "--domain" => {
                domain_path = Some(option_value(args, i));
                i += 2;
            }
            "--strategy" => {
                strategy = option_value(args, i);
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `dsf vocab`: {}", other);
                eprintln!("Run `dsf vocab --help` for usage.");
                process::exit(1);
            }
        }
    }

    let domain_path = domain_path.unwrap_or_else(|| {
        eprintln!("Missing --domain");
        process::exit(1);
    });
    let (domain, _) = load_domain(&domain_path);
    let featurizer =
        TrackerFeaturizer::load(&strategy, &domain).unwrap_or_else(|| unknown_strategy(&strategy));
    let encoder = featurizer.encoder();
    info!(
        strategy = encoder.name(),
        num_features = encoder.num_features(),
        "prepared encoder"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (idx, name) in encoder.feature_names().iter().enumerate() {
        writeln!(out, "{idx}\t{name}").unwrap_or_else(|e| {
            eprintln!("Failed to write output: {e}");
            process::exit(1);
        });
    }
    out.flush().unwrap_or_else(|e| {
        eprintln!("Failed to write output: {e}");
        process::exit(1);
    });
}

#[derive(Serialize)]
#[serde(untagged)]
enum Values {
    Int(Vec<i32>),
    Float(Vec<f64>),
}

/// One stdout line of `dsf encode`.
#[derive(Serialize)]
struct EncodedRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u64>,
    output: &'static str,
    dtype: &'static str,
    width: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Values>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indptr: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indices: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Values>,
}

impl EncodedRow {
    fn new(line: Option<u64>, encoded: &Encoded) -> Self {
        let mut row = EncodedRow {
            line,
            output: encoded.kind().as_str(),
            dtype: encoded.dtype().as_str(),
            width: encoded.width(),
            values: None,
            indptr: None,
            indices: None,
            data: None,
        };
        match encoded {
            Encoded::Dense(DenseVector::Int(v)) => row.values = Some(Values::Int(v.to_vec())),
            Encoded::Dense(DenseVector::Float(v)) => row.values = Some(Values::Float(v.to_vec())),
            Encoded::Sparse(SparseRow::Int(m)) => {
                row.indptr = Some(m.indptr().to_vec());
                row.indices = Some(m.indices().to_vec());
                row.data = Some(Values::Int(m.data().to_vec()));
            }
            Encoded::Sparse(SparseRow::Float(m)) => {
                row.indptr = Some(m.indptr().to_vec());
                row.indices = Some(m.indices().to_vec());
                row.data = Some(Values::Float(m.data().to_vec()));
            }
        }
        row
    }
}

/// One stdout line of `dsf encode` when a history window is configured.
#[derive(Serialize)]
struct WindowRow {
    line: u64,
    /// Oldest turn first, left-padded with absent-state rows.
    window: Vec<EncodedRow>,
}

fn write_json_line<T: Serialize>(out: &mut impl Write, value: &T) {
    serde_json::to_writer(&mut *out, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(out))
        .unwrap_or_else(|e| {
            eprintln!("Failed to write output: {e}");
            process::exit(1);
        });
}

fn cmd_encode(args: &[String]) {
    let mut domain_path: Option<String> = None;
    let mut states_path: Option<String> = None;
    let mut strategy: Option<String> = None;
    let mut output: Option<OutputKind> = None;
    let mut max_history: Option<usize> = None;
    let mut config_path: Option<String> = None;
    let mut log_path: Option<String> = None;
    let mut manifest_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"dsf encode

USAGE:
    dsf encode --domain domain.yaml --states states.ndjson [--strategy NAME] [--output dense|sparse]

OPTIONS:
    --domain PATH       Path to YAML domain (required)
    --states PATH       NDJSON file, one state object (or null) per line (required)
    --strategy NAME     Encoder strategy (default: from config, else binary)
    --output KIND       dense | sparse (default: from config, else dense)
    --max-history N     Print, per state, the window of the last N turns (left-padded)
    --config PATH       Path to YAML config
    --log PATH          Append NDJSON encode events to PATH
    --manifest PATH     Write a run manifest (JSON) to PATH
"#
                );
                return;
            }
            "--domain" => {
                domain_path = Some(option_value(args, i));
                i += 2;
            }
            "--states" => {
                states_path = Some(option_value(args, i));
                i += 2;
            }
            "--strategy" => {
                strategy = Some(option_value(args, i));
                i += 2;
            }
            "--output" => {
                let v = option_value(args, i);
                output = Some(v.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid --output value: {e}");
                    process::exit(1);
                }));
                i += 2;
            }
            "--max-history" => {
                let v = option_value(args, i);
                max_history = Some(v.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid --max-history value: {v}");
                    process::exit(1);
                }));
                i += 2;
            }
            "--config" => {
                config_path = Some(option_value(args, i));
                i += 2;
            }
            "--log" => {
                log_path = Some(option_value(args, i));
                i += 2;
            }
            "--manifest" => {
                manifest_path = Some(option_value(args, i));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `dsf encode`: {}", other);
                eprintln!("Run `dsf encode --help` for usage.");
                process::exit(1);
            }
        }
    }

    let domain_path = domain_path.unwrap_or_else(|| {
        eprintln!("Missing --domain");
        process::exit(1);
    });
    let states_path = states_path.unwrap_or_else(|| {
        eprintln!("Missing --states");
        process::exit(1);
    });

    let (mut cfg, config_hash) = match &config_path {
        Some(p) => {
            let bytes = fs::read(p).unwrap_or_else(|e| {
                eprintln!("Failed to read config file: {e}");
                process::exit(1);
            });
            let cfg = Config::load(p).unwrap_or_else(|e| {
                eprintln!("Failed to load config: {e}");
                process::exit(1);
            });
            (cfg, Some(dsf_logging::hash_bytes(&bytes)))
        }
        None => (Config::default(), None),
    };
    if let Some(s) = strategy {
        cfg.featurizer.strategy = s;
    }
    if let Some(o) = output {
        cfg.featurizer.output = o;
    }
    if max_history.is_some() {
        cfg.featurizer.max_history = max_history;
    }
    if let Err(msg) = validate_config(&cfg) {
        eprintln!("Invalid config: {msg}");
        process::exit(1);
    }

    let (domain, domain_bytes) = load_domain(&domain_path);
    let domain_hash = dsf_logging::hash_bytes(&domain_bytes);
    let featurizer = TrackerFeaturizer::from_config(&cfg.featurizer, &domain)
        .unwrap_or_else(|| unknown_strategy(&cfg.featurizer.strategy));
    let encoder = featurizer.encoder();
    let output = featurizer.output();
    info!(
        strategy = encoder.name(),
        num_features = encoder.num_features(),
        output = output.as_str(),
        "prepared encoder"
    );

    let run_id = format!("encode-{}", dsf_logging::now_ms());
    let v = || dsf_logging::VersionInfoV1 {
        feature_schema_id: FEATURE_SCHEMA_ID,
        strategy: encoder.name(),
    };

    let mut manifest = dsf_logging::RunManifestV1 {
        run_manifest_version: dsf_logging::RUN_MANIFEST_VERSION,
        run_id: run_id.clone(),
        created_ts_ms: dsf_logging::now_ms(),
        feature_schema_id: FEATURE_SCHEMA_ID,
        strategy: encoder.name().to_string(),
        output: output.as_str().to_string(),
        num_features: encoder.num_features() as u64,
        git_hash: dsf_logging::try_git_hash(),
        domain_hash: domain_hash.clone(),
        config_hash,
        states_path: states_path.clone(),
        log_path: log_path.clone(),
        states_encoded: 0,
        absent_states: 0,
        completed_ts_ms: None,
    };
    if let Some(p) = &manifest_path {
        dsf_logging::write_manifest_atomic(p, &manifest).unwrap_or_else(|e| {
            eprintln!("Failed to write run manifest: {e}");
            process::exit(1);
        });
    }

    let mut log = log_path.as_ref().map(|p| {
        dsf_logging::NdjsonWriter::open_append_with_flush(p, cfg.logging.flush_every_lines)
            .unwrap_or_else(|e| {
                eprintln!("Failed to open event log: {e}");
                process::exit(1);
            })
    });
    if let Some(w) = log.as_mut() {
        w.write_event(&dsf_logging::VocabEventV1 {
            event: "vocab",
            ts_ms: dsf_logging::now_ms(),
            v: v(),
            run_id: run_id.clone(),
            num_features: encoder.num_features() as u64,
            domain_hash,
        })
        .unwrap_or_else(|e| {
            eprintln!("Failed to write event log: {e}");
            process::exit(1);
        });
    }

    let states_file = File::open(&states_path).unwrap_or_else(|e| {
        eprintln!("Failed to open states file: {e}");
        process::exit(1);
    });
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let windowed = featurizer.max_history().is_some();
    let mut turns: Vec<(u64, Encoded)> = Vec::new();

    for (idx, line) in BufReader::new(states_file).lines().enumerate() {
        let line_no = idx as u64 + 1;
        let line = line.unwrap_or_else(|e| {
            eprintln!("Failed to read states file: {e}");
            process::exit(1);
        });
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let state: Option<State> = serde_json::from_str(trimmed).unwrap_or_else(|e| {
            eprintln!("Invalid state on line {line_no}: {e}");
            process::exit(1);
        });

        let encoded = encoder.encode(state.as_ref(), output);
        if !windowed {
            write_json_line(&mut out, &EncodedRow::new(Some(line_no), &encoded));
        }

        manifest.states_encoded += 1;
        if state.is_none() {
            manifest.absent_states += 1;
        }
        if let Some(w) = log.as_mut() {
            w.write_event(&dsf_logging::EncodeEventV1 {
                event: "encode_state",
                ts_ms: dsf_logging::now_ms(),
                v: v(),
                run_id: run_id.clone(),
                line: line_no,
                absent: state.is_none(),
                labels: state.as_ref().map_or(0, |s| s.len() as u64),
                output: output.as_str(),
                dtype: encoded.dtype().as_str(),
                width: encoded.width() as u64,
                nnz: encoded.nonzeros().len() as u64,
            })
            .unwrap_or_else(|e| {
                eprintln!("Failed to write event log: {e}");
                process::exit(1);
            });
        }
        if windowed {
            turns.push((line_no, encoded));
        }
    }

    if windowed {
        let (lines, rows): (Vec<u64>, Vec<Encoded>) = turns.into_iter().unzip();
        for (line, window) in lines.into_iter().zip(featurizer.windows(&rows)) {
            let window = window.iter().map(|e| EncodedRow::new(None, e)).collect();
            write_json_line(&mut out, &WindowRow { line, window });
        }
    }

    out.flush().unwrap_or_else(|e| {
        eprintln!("Failed to write output: {e}");
        process::exit(1);
    });
    if let Some(w) = log.as_mut() {
        w.flush().unwrap_or_else(|e| {
            eprintln!("Failed to flush event log: {e}");
            process::exit(1);
        });
    }

    manifest.completed_ts_ms = Some(dsf_logging::now_ms());
    if let Some(p) = &manifest_path {
        dsf_logging::write_manifest_atomic(p, &manifest).unwrap_or_else(|e| {
            eprintln!("Failed to write run manifest: {e}");
            process::exit(1);
        });
    }
    info!(
        states = manifest.states_encoded,
        absent = manifest.absent_states,
        "encode complete"
    );
}

fn main() {
    telemetry::init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(1);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" | "version" => {
            print_version();
        }
        "vocab" => {
            cmd_vocab(&args[2..]);
        }
        "encode" => {
            cmd_encode(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `dsf --help` for usage.");
            process::exit(1);
        }
    }
}
