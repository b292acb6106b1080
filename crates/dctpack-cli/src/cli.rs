use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Encode(encode::EncodeArgs),
    Decode(decode::DecodeArgs),
    Inspect(inspect::InspectArgs),
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_have_a_consistent_command_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn should_parse_encode_arguments() {
        let args =
            CliArgs::try_parse_from(["dctpack", "encode", "-i", "a.png", "-t", "t.txt", "-d", "d.bin"])
                .unwrap();
        match args.command {
            Commands::Encode(encode) => {
                assert_eq!(encode.image, Path::new("a.png"));
                assert_eq!(encode.table_file, Path::new("t.txt"));
                assert_eq!(encode.data_file, Path::new("d.bin"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn should_require_the_output_of_decode() {
        assert!(CliArgs::try_parse_from(["dctpack", "decode", "-t", "t.txt", "-d", "d.bin"]).is_err());
    }
}
