use anyhow::Context;
use console::style;

use crate::cli::CommonArgs;
use crate::github::{CommitHost, GithubClient};

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let org = common.require_org()?;
    let token = common.resolve_token()?;

    let client = GithubClient::new(token, &common.api_url, common.request_timeout())
        .context("Failed to build API client")?;

    let repos = client
        .list_repos(org)
        .context("Failed to enumerate organization repositories")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
    } else {
        println!("{}", style(format!("Repositories in {org}")).bold());
        for name in &repos {
            println!("  {name}");
        }
        println!("\n{} repositories", repos.len());
    }

    Ok(())
}
