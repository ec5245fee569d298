use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;

use qblast_config::config::{Args, USAGE};
use qblast_http::{QBlastClient, ResultsOptions, Retrieved, SearchOptions, SearchRequest};

/// Submit, poll and retrieve remote sequence searches.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = USAGE)]
struct Cli {
  #[command(flatten)]
  config: Args,
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Submit a search and print its request id and estimated time to completion.
  Search {
    query: String,
    database: String,
    program: String,
    #[command(flatten)]
    options: SearchArgs,
    /// Wait for the search to complete and output its results.
    #[arg(long)]
    wait: bool,
    /// The format of the results when waiting.
    #[arg(long, requires = "wait")]
    results_format: Option<String>,
    /// Where bulk results are written when waiting.
    #[arg(short, long, requires = "wait")]
    output: Option<PathBuf>,
  },
  /// Print the status of a job.
  Status { rid: String },
  /// Retrieve the results of a job.
  Results {
    rid: String,
    #[command(flatten)]
    options: ResultsArgs,
  },
  /// Wait for a job to complete and output its results.
  Wait {
    rid: String,
    /// Seconds to wait before the first status check.
    estimate: u64,
    #[command(flatten)]
    options: ResultsArgs,
  },
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
  #[arg(long)]
  filter: Option<String>,
  #[arg(long)]
  format_type: Option<String>,
  #[arg(long, allow_negative_numbers = true)]
  expect: Option<f64>,
  #[arg(long, allow_negative_numbers = true)]
  nucl_reward: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  nucl_penalty: Option<i64>,
  /// Gap existence and extension costs.
  #[arg(long, num_args = 2, value_names = ["EXISTENCE", "EXTENSION"], allow_negative_numbers = true)]
  gapcosts: Option<Vec<i64>>,
  #[arg(long)]
  matrix: Option<String>,
  #[arg(long, allow_negative_numbers = true)]
  hitlist_size: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  descriptions: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  alignments: Option<i64>,
  #[arg(long)]
  ncbi_gi: Option<String>,
  #[arg(long, allow_negative_numbers = true)]
  threshold: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  word_size: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  composition_based_statistics: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  num_threads: Option<i64>,
}

impl From<SearchArgs> for SearchOptions {
  fn from(args: SearchArgs) -> Self {
    Self {
      filter: args.filter,
      format_type: args.format_type,
      expect: args.expect,
      nucl_reward: args.nucl_reward,
      nucl_penalty: args.nucl_penalty,
      gapcosts: args.gapcosts.and_then(|costs| match costs.as_slice() {
        [existence, extension] => Some((*existence, *extension)),
        _ => None,
      }),
      matrix: args.matrix,
      hitlist_size: args.hitlist_size,
      descriptions: args.descriptions,
      alignments: args.alignments,
      ncbi_gi: args.ncbi_gi,
      threshold: args.threshold,
      word_size: args.word_size,
      composition_based_statistics: args.composition_based_statistics,
      num_threads: args.num_threads,
    }
  }
}

#[derive(ClapArgs, Debug)]
struct ResultsArgs {
  #[arg(long)]
  format_type: Option<String>,
  #[arg(long, allow_negative_numbers = true)]
  hitlist_size: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  descriptions: Option<i64>,
  #[arg(long, allow_negative_numbers = true)]
  alignments: Option<i64>,
  #[arg(long)]
  ncbi_gi: Option<String>,
  #[arg(long)]
  format_object: Option<String>,
  /// Where bulk results are written.
  #[arg(short, long)]
  output: Option<PathBuf>,
}

impl From<ResultsArgs> for ResultsOptions {
  fn from(args: ResultsArgs) -> Self {
    Self {
      format_type: args.format_type,
      hitlist_size: args.hitlist_size,
      descriptions: args.descriptions,
      alignments: args.alignments,
      ncbi_gi: args.ncbi_gi,
      format_object: args.format_object,
      results_file_path: args.output,
    }
  }
}

fn print_retrieved(retrieved: Retrieved) {
  match retrieved {
    Retrieved::InMemoryText(text) => print!("{text}"),
    Retrieved::WrittenToPath(path) => println!("{}", path.display()),
  }
}

#[tokio::main]
async fn main() -> io::Result<()> {
  let cli = Cli::parse();

  let Some(config) = cli.config.load()? else {
    return Ok(());
  };
  config.setup_tracing()?;

  debug!(config = ?config, "config parsed");

  let Some(command) = cli.command else {
    return Ok(());
  };

  let client = QBlastClient::from_config(&config)?;

  match command {
    Command::Search {
      query,
      database,
      program,
      options,
      wait,
      results_format,
      output,
    } => {
      let request = SearchRequest::new(query, database, program).with_options(options.into());
      let job = client.search(&request).await?;

      println!("RID={}", job.rid());
      println!("RTOE={}", job.estimate().as_secs());

      if wait {
        let options = ResultsOptions {
          format_type: results_format,
          results_file_path: output,
          ..Default::default()
        };
        print_retrieved(client.wait_for_job(&job, &options).await?);
      }
    }
    Command::Status { rid } => println!("{}", client.check_status(&rid).await?),
    Command::Results { rid, options } => {
      print_retrieved(client.results(&rid, &options.into()).await?)
    }
    Command::Wait {
      rid,
      estimate,
      options,
    } => print_retrieved(
      client
        .wait_for_results(&rid, Duration::from_secs(estimate), &options.into())
        .await?,
    ),
  }

  Ok(())
}
