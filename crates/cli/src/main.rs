use clap::Parser;
use colored::*;
use sonar_corelib::{exporters, logging, Config, ReportFactory};
use std::path::PathBuf;
use tracing::{error, info, Level};

fn print_banner(show_quick_start: bool) {
    println!();
    println!(
        "{}",
        "  ███████╗ ██████╗ ███╗   ██╗ █████╗ ██████╗     ██████╗ ███████╗██████╗  ██████╗ ██████╗ ████████╗"
            .bright_blue()
    );
    println!(
        "{}",
        "  ██╔════╝██╔═══██╗████╗  ██║██╔══██╗██╔══██╗    ██╔══██╗██╔════╝██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝"
            .bright_blue()
    );
    println!(
        "{}",
        "  ███████╗██║   ██║██╔██╗ ██║███████║██████╔╝    ██████╔╝█████╗  ██████╔╝██║   ██║██████╔╝   ██║   "
            .bright_blue()
    );
    println!(
        "{}",
        "  ╚════██║██║   ██║██║╚██╗██║██╔══██║██╔══██╗    ██╔══██╗██╔══╝  ██╔═══╝ ██║   ██║██╔══██╗   ██║   "
            .bright_blue()
    );
    println!(
        "{}",
        "  ███████║╚██████╔╝██║ ╚████║██║  ██║██║  ██║    ██║  ██║███████╗██║     ╚██████╔╝██║  ██║   ██║   "
            .bright_blue()
    );
    println!(
        "{}",
        "  ╚══════╝ ╚═════╝ ╚═╝  ╚═══╝╚═╝  ╚═╝╚═╝  ╚═╝    ╚═╝  ╚═╝╚══════╝╚═╝      ╚═════╝ ╚═╝  ╚═╝   ╚═╝   "
            .bright_blue()
    );
    println!();
    println!(
        "{}",
        format!("                    📊 SonarQube project reports v{}", sonar_corelib::VERSION)
            .bright_white()
    );
    println!();

    if show_quick_start {
        println!("{}", "💡 Quick Start:".bright_yellow());
        println!(
            "{}",
            "   sonar-report -s http://localhost:9000 -p my-project".bright_white()
        );
        println!(
            "{}",
            "   sonar-report -s http://localhost:9000 -t <token> -p my-project -o ./out"
                .bright_white()
        );
        println!(
            "{}",
            "   SONAR_URL=http://localhost:9000 SONAR_PROJECT_ID=my-project sonar-report"
                .bright_white()
        );
        println!("{}", "   sonar-report --help".bright_white());
        println!();
    }
}

#[derive(Parser)]
#[command(
    name = "sonar-report",
    about = "📊 Sonar Report - quality reports for a SonarQube project",
    version,
    long_about = "Sonar Report queries a SonarQube server for one project (measures, issues, quality profiles, quality gate) and writes a Markdown report, CSV issue sheets and the profile and gate configurations.",
    after_help = "💡 Examples:\n  sonar-report -s http://localhost:9000 -p my-project\n  sonar-report -s https://sonar.example.com -t <token> -p my-project --no-conf"
)]
struct Cli {
    /// SonarQube server URL (overrides SONAR_URL)
    #[arg(short, long, value_name = "URL", help_heading = "SERVER")]
    server: Option<String>,

    /// Access token (overrides SONAR_TOKEN)
    #[arg(short, long, value_name = "TOKEN", help_heading = "SERVER")]
    token: Option<String>,

    /// Key of the project to report (overrides SONAR_PROJECT_ID)
    #[arg(short, long, value_name = "KEY", help_heading = "SERVER")]
    project: Option<String>,

    /// JSON file replacing the built-in request templates
    #[arg(long, value_name = "FILE", help_heading = "SERVER")]
    requests: Option<PathBuf>,

    /// Results requested per page (1-500)
    #[arg(long, value_name = "N", help_heading = "SERVER")]
    page_size: Option<u32>,

    /// Author written in the report
    #[arg(short, long, value_name = "NAME", help_heading = "REPORT")]
    author: Option<String>,

    /// Report date, today when omitted
    #[arg(short, long, value_name = "YYYY-MM-DD", help_heading = "REPORT")]
    date: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", help_heading = "OUTPUT")]
    output: Option<PathBuf>,

    /// Skip the quality profile and quality gate configuration exports
    #[arg(long, help_heading = "OUTPUT")]
    no_conf: bool,

    /// Verbosity level
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value = "info",
        help_heading = "LOGGING"
    )]
    verbosity: Level,
}

impl Cli {
    /// Applies the command line on top of the environment configuration
    fn apply(self, mut config: Config) -> Config {
        if let Some(server) = self.server {
            config.server_url = server;
        }
        if let Some(token) = self.token {
            config.token = Some(token);
        }
        if let Some(project) = self.project {
            config.project_key = project;
        }
        if let Some(requests) = self.requests {
            config.requests_file = Some(requests);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(author) = self.author {
            config.author = author;
        }
        if let Some(date) = self.date {
            config.report_date = date;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if self.no_conf {
            config.export_conf = false;
        }
        config
    }
}

async fn run(config: &Config) -> sonar_corelib::Result<Vec<PathBuf>> {
    info!(
        "Generating report for {} on {}",
        config.project_key, config.server_url
    );

    let report = ReportFactory::new(config)?.create().await?;
    exporters::export_all(&report, config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbosity) {
        eprintln!("{}", format!("Could not set up logging: {}", e).red());
    }

    let config = match Config::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", format!("❌ {}", e).red());
            std::process::exit(1);
        }
    };

    let show_quick_start = config.project_key.trim().is_empty();
    print_banner(show_quick_start);

    if show_quick_start {
        println!("{}", "📋 Usage:".bright_yellow());
        println!(
            "{}",
            "   sonar-report -s <url> -p <project> [-t <token>] [-o <dir>]".bright_white()
        );
        println!();
        println!("{}", "🔧 Options:".bright_yellow());
        println!("{}", "   -s <url>       SonarQube server URL".bright_white());
        println!("{}", "   -t <token>     Access token".bright_white());
        println!("{}", "   -p <project>   Project key (required)".bright_white());
        println!("{}", "   -a <author>    Report author".bright_white());
        println!("{}", "   -d <date>      Report date (YYYY-MM-DD)".bright_white());
        println!(
            "{}",
            "   -o <dir>       Output directory (default: ./reports)".bright_white()
        );
        println!(
            "{}",
            "   --no-conf      Skip profile and gate configuration exports".bright_white()
        );
        println!("{}", "   --help         Show all options".bright_white());
        println!();
        return;
    }

    match run(&config).await {
        Ok(files) => {
            println!("{}", "✅ Report generated successfully!".bright_green());
            for file in files {
                println!("{}", format!("📄 {}", file.display()).bright_blue());
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", format!("❌ {}", e).red());
            std::process::exit(1);
        }
    }
}
