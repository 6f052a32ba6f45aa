// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::Result;

mod cli;

#[tokio::main]
async fn main() {
    scheduler::try_or_exit(run()).await;
}

async fn run() -> Result<()> {
    let args = cli::parse_args();

    cli::run(args).await
}
