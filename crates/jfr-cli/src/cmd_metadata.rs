/// Implementation of `jfr metadata`.
///
/// Prints the metadata element tree as an indented outline, optionally
/// preceded by the string pool.
///
/// ```text
/// Strings (4):
///   [0] "root"
///   [1] <unsupported encoding 5>
///   [2] "class"
///   [3] "name"
///
/// E: root
///     E: class
///       A: name=jdk.ThreadPark
/// ```
use anyhow::Result;
use jfr_decoder::{DecoderConfig, PoolEntry};

use crate::MetadataArgs;

/// Run the `jfr metadata` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the chunk fails to
/// decode.
pub fn run(args: &MetadataArgs, config: &DecoderConfig) -> Result<()> {
    let chunk = crate::decode_file(&args.file, config)?;
    let metadata = &chunk.metadata;

    if args.strings {
        println!("Strings ({}):", metadata.strings.len());
        for (index, entry) in metadata.strings.iter().enumerate() {
            match entry {
                PoolEntry::Text(text) => println!("  [{index}] {text:?}"),
                PoolEntry::Unsupported { encoding } => {
                    println!("  [{index}] <unsupported encoding {encoding}>");
                }
            }
        }
        println!();
    }

    print!("{}", metadata.root);
    Ok(())
}
