use chunk_tag::{ChunkReader, Tag, TagError};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

fn describe<P: chunk_tag::Packed>(tag: Result<Tag<P>, TagError>) -> Result<String, TagError> {
	match tag {
		Ok(tag) => Ok(format!("{tag:?} ({})", tag.to_hex())),
		Err(err) if err.is_truncated() => Ok("truncated".into()),
		Err(err) => Err(err),
	}
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env()
				.or_else(|_| EnvFilter::try_new("chunk_tag=info"))
				.map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?,
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let paths: Vec<_> = std::env::args_os().skip(1).collect();
	if paths.is_empty() {
		eprintln!("usage: tag-sniff <FILE>...");
		std::process::exit(2);
	}

	for path in paths {
		tracing::debug!(?path, "reading file");
		let data = tokio::fs::read(&path).await?;
		let mut reader = ChunkReader::new(data.as_slice());

		let long = describe(reader.peek_tag::<u64>())?;
		let short = describe(reader.peek_tag::<u32>())?;
		println!("{}", path.to_string_lossy());
		println!("  tag4: {short}");
		println!("  tag8: {long}");
	}

	Ok(())
}
