use std::path::PathBuf;

use clap::Parser;

/// Converts an iCalendar file into timewarrior `inc` entries.
#[derive(Debug, Parser)]
#[command(name = "timewics", version)]
#[command(about = "Convert iCalendar events into timewarrior intervals", long_about = None)]
pub struct Args {
    /// Directory the `.data` file is written to [default: output.directory]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Calendar file to convert
    #[arg(value_name = "CALENDAR")]
    pub calendar: PathBuf,

    /// Extra tags added to every entry after the event summary
    #[arg(value_name = "TAG")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_calendar_and_tags() {
        let args = Args::try_parse_from(["timewics", "work.ics", "work", "client"]).unwrap();
        assert_eq!(args.calendar, PathBuf::from("work.ics"));
        assert_eq!(args.tags, ["work", "client"]);
        assert_eq!(args.output_directory, None);
    }

    #[test]
    fn parses_output_directory() {
        let args = Args::try_parse_from(["timewics", "-o", "/tmp/out", "cal.ics"]).unwrap();
        assert_eq!(args.output_directory, Some(PathBuf::from("/tmp/out")));
        assert!(args.tags.is_empty());

        let args =
            Args::try_parse_from(["timewics", "--output-directory", "data", "cal.ics", "x"]).unwrap();
        assert_eq!(args.output_directory, Some(PathBuf::from("data")));
    }

    #[test]
    fn calendar_is_required() {
        assert!(Args::try_parse_from(["timewics"]).is_err());
    }
}
