use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for moodmap-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors: Option<bool>,
    pub allow_signup: Option<bool>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub config_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub memory: bool,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        let matches = Command::new("moodmap-server")
            .version(moodmap::VERSION)
            .about("HTTP API server for the moodmap community and recommendation backend")
            .long_about(
                r#"moodmap-server exposes the community board, saved places and the
place recommendation pipeline over a JSON REST API with JWT authentication.

The server can be configured through command line arguments or environment
variables. Command line arguments take precedence over environment variables.
Library settings (storage, places and LLM providers, cache, uploads) come from
the moodmap configuration file and MOODMAP_* variables.

Examples:
  moodmap-server --port 8080
  moodmap-server --config moodmap.toml --allow-signup=false
  moodmap-server --memory --log-level debug"#,
            )
            .arg(
                Arg::new("host")
                    .long("host")
                    .value_name("HOST")
                    .help("Address to bind")
                    .long_help(
                        "Interface address for the HTTP server.
Environment variable: MOODMAP_SERVER_HOST",
                    )
                    .value_hint(ValueHint::Hostname),
            )
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on")
                    .long_help(
                        "Port number for the HTTP server to listen on.
Environment variable: MOODMAP_SERVER_PORT",
                    )
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("moodmap configuration file")
                    .long_help(
                        "Path to a moodmap configuration file (TOML, YAML or JSON).
It is merged over the defaults and under MOODMAP_* environment variables.
Environment variable: MOODMAP_SERVER_CONFIG_FILE",
                    )
                    .value_hint(ValueHint::FilePath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("data_dir")
                    .long("data-dir")
                    .value_name("DIR")
                    .help("Directory for the on-disk database")
                    .value_hint(ValueHint::DirPath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("memory")
                    .long("memory")
                    .help("Use in-memory storage")
                    .long_help(
                        "Keep everything in memory. Data is lost when the server stops.",
                    )
                    .action(ArgAction::SetTrue)
                    .conflicts_with("data_dir"),
            )
            .arg(
                Arg::new("no_cors")
                    .long("no-cors")
                    .help("Disable permissive CORS")
                    .long_help(
                        "Do not send CORS headers.
Environment variable: MOODMAP_SERVER_CORS",
                    )
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("allow_signup")
                    .long("allow-signup")
                    .value_name("BOOL")
                    .help("Allow user registration")
                    .long_help(
                        "Allow new users to register accounts via the signup API.
Environment variable: MOODMAP_SERVER_ALLOW_SIGNUP",
                    )
                    .value_parser(clap::value_parser!(bool)),
            )
            .arg(
                Arg::new("jwt_secret")
                    .long("jwt-secret")
                    .value_name("SECRET")
                    .help("JWT signing secret")
                    .long_help(
                        "Secret key used for signing JWT tokens. If not provided,
a random one is generated and tokens do not survive a restart.
Environment variable: MOODMAP_SERVER_JWT_SECRET",
                    )
                    .value_hint(ValueHint::Other),
            )
            .arg(
                Arg::new("jwt_expiration")
                    .long("jwt-expiration")
                    .value_name("HOURS")
                    .help("JWT token expiration time in hours")
                    .long_help(
                        "How long JWT tokens remain valid before expiring.
Default is 24 hours.
Environment variable: MOODMAP_SERVER_JWT_EXPIRATION_HOURS",
                    )
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("max_upload_bytes")
                    .long("max-upload-bytes")
                    .value_name("BYTES")
                    .help("Maximum request body size in bytes")
                    .long_help(
                        "Maximum size allowed for HTTP request bodies, uploads included.
Environment variable: MOODMAP_SERVER_MAX_UPLOAD_BYTES",
                    )
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Logging level")
                    .long_help(
                        "Set the logging level. Valid values: error, warn, info, debug, trace
Environment variable: RUST_LOG",
                    )
                    .value_parser(["error", "warn", "info", "debug", "trace"]),
            )
            .arg(
                Arg::new("help_env")
                    .long("help-env")
                    .help("Show all environment variables")
                    .action(ArgAction::SetTrue),
            )
            .get_matches();

        if matches.get_flag("help_env") {
            Self::print_env_help();
            std::process::exit(0);
        }

        Self {
            host: matches.get_one::<String>("host").cloned(),
            port: matches.get_one::<u16>("port").copied(),
            cors: if matches.get_flag("no_cors") {
                Some(false)
            } else {
                None
            },
            allow_signup: matches.get_one::<bool>("allow_signup").copied(),
            jwt_secret: matches.get_one::<String>("jwt_secret").cloned(),
            jwt_expiration_hours: matches.get_one::<u64>("jwt_expiration").copied(),
            max_upload_bytes: matches.get_one::<usize>("max_upload_bytes").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            data_dir: matches.get_one::<PathBuf>("data_dir").cloned(),
            memory: matches.get_flag("memory"),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }

    /// Print environment variable help
    fn print_env_help() {
        println!("moodmap-server Environment Variables");
        println!("====================================");
        println!();
        println!("Server:");
        println!("  MOODMAP_SERVER_HOST               - Bind address (default: 0.0.0.0)");
        println!("  MOODMAP_SERVER_PORT               - Server port (default: 8000)");
        println!("  MOODMAP_SERVER_CORS               - Permissive CORS (default: true)");
        println!("  MOODMAP_SERVER_MAX_UPLOAD_BYTES   - Max request body size (default: 10MB)");
        println!("  MOODMAP_SERVER_CONFIG_FILE        - moodmap configuration file");
        println!();
        println!("Authentication:");
        println!(
            "  MOODMAP_SERVER_JWT_SECRET         - JWT signing secret (auto-generated if not set)"
        );
        println!("  MOODMAP_SERVER_JWT_EXPIRATION_HOURS - JWT expiration in hours (default: 24)");
        println!("  MOODMAP_SERVER_ALLOW_SIGNUP       - Allow user registration (default: true)");
        println!();
        println!("Library (nested keys use a double underscore):");
        println!("  MOODMAP_STORAGE__ENGINE           - memory or rocksdb");
        println!("  MOODMAP_STORAGE__DATA_DIR         - Database directory");
        println!("  MOODMAP_PLACES__API_KEY           - Places provider API key");
        println!("  MOODMAP_LLM__API_KEY              - LLM provider API key");
        println!("  MOODMAP_UPLOADS__DIR              - Upload directory served under /media");
        println!("  MOODMAP_SEED__EMOTIONS_CSV        - Emotion seed file loaded at startup");
        println!("  MOODMAP_SEED__LOCATIONS_CSV       - Location seed file loaded at startup");
        println!();
        println!("Logging:");
        println!(
            "  RUST_LOG                          - Logging level (error, warn, info, debug, trace)"
        );
        println!();
        println!("Note: Command line arguments take precedence over environment variables.");
    }
}
