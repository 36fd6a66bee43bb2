use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = tunetask_api::Args::parse();

	tunetask_api::run(args).await
}
