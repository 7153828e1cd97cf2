use crate::{config::AppConfig, modules::handlers::split_tags};
use anyhow::{Context, Result};
use cf_tracker_libs::{api::UnattemptedQuery, CodeforcesClient, ContestData};
use clap::Args;

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Codeforces handle, the configured default handle when omitted.
    #[arg(long)]
    handle: Option<String>,
    /// Comma separated tags.
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    rating: Option<i32>,
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..=100))]
    count: u16,
    #[arg(long)]
    random: bool,
}

pub async fn run(args: RecommendArgs, config: &AppConfig) -> Result<()> {
    let handle = args
        .handle
        .clone()
        .unwrap_or_else(|| config.default_handle.clone());
    let client = CodeforcesClient::new(&config.codeforces).with_context(|| {
        let message = "couldn't create Codeforces API client. check the value of CF_API_BASE_URL.";
        tracing::error!(message);
        message
    })?;

    let query = UnattemptedQuery {
        tags: split_tags(args.tags.as_deref()),
        rating: args.rating,
        count: args.count as usize,
        random: args.random,
    };

    let problems = client
        .get_unattempted_problems(&handle, &query)
        .await
        .with_context(|| {
            let message = format!("failed to find unattempted problems for {}", handle);
            tracing::error!(message);
            message
        })?;

    tracing::info!("{} unattempted problems found for {}", problems.len(), handle);
    for problem in problems {
        let rating = problem
            .rating
            .map(|rating| rating.to_string())
            .unwrap_or(String::from("-"));
        println!(
            "{}\t{}\t{}\t{}",
            rating,
            problem.key(),
            problem.name,
            problem.url
        );
    }

    Ok(())
}
