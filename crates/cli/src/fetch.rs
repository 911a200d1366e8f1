pub(crate) mod client;
pub(crate) mod error;

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;

use tracing::info;

use crate::cli::FetchArgs;
use crate::cli::Resource;
use crate::error::CliError;
use crate::fetch::client::MessageClient;

pub(crate) fn fetch(args: FetchArgs) -> Result<(), CliError> {
    let client = MessageClient::new(&args.domain, args.token);

    match args.resource_type {
        Resource::Messages => {
            info!(domain = %args.domain, "fetching raw messages");
            let messages = client.messages(args.after, args.before)?;
            info!(count = messages.len(), "fetched raw messages");

            let file = File::create(&args.output_file)?;
            let mut writer = BufWriter::new(file);

            serde_json::to_writer(&mut writer, &messages)?;
            writer.flush()?;

            info!(path = %args.output_file.display(), "wrote the raw message export");
        }
        Resource::Archives => {
            info!(domain = %args.domain, "fetching message archives");
            let bytes = client.download_archives(&args.output_file)?;
            info!(
                bytes,
                path = %args.output_file.display(),
                "downloaded and decompressed the message archives"
            );
        }
    }

    Ok(())
}
