/// Command-line usage, printed on `--help` or a parse error.
pub const USAGE: &str = "\
Usage: mazecarve [OPTIONS] [WIDTH HEIGHT]

Generates a maze by randomized depth-first-search carving and animates the
process in the terminal.

Options:
  --seed <N>        Fix the random seed for a reproducible maze
  --origin <X,Y>    Cell the first walk starts from (default: random)
  --batch           Generate without animation, print the maze and statistics
  -h, --help        Show this help";

/// Runtime configuration, parsed by hand from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub width: u16,
    pub height: u16,
    pub seed: Option<u64>,
    pub origin: Option<(u16, u16)>,
    pub batch: bool,
    pub help: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width: 20,
            height: 20,
            seed: None,
            origin: None,
            batch: false,
            help: false,
        }
    }
}

impl AppConfig {
    /// Parses the arguments after the executable name.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<AppConfig, String> {
        let mut config = AppConfig::default();
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--batch" => config.batch = true,
                "-h" | "--help" => config.help = true,
                "--seed" => {
                    let value = args.next().ok_or("--seed requires a value")?;
                    config.seed = Some(
                        value
                            .parse()
                            .map_err(|_| format!("invalid seed: {value}"))?,
                    );
                }
                "--origin" => {
                    let value = args.next().ok_or("--origin requires a value")?;
                    config.origin = Some(parse_coord(&value)?);
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown option: {other}"));
                }
                number => positional.push(
                    number
                        .parse::<u16>()
                        .map_err(|_| format!("invalid dimension: {number}"))?,
                ),
            }
        }

        match positional[..] {
            [] => {}
            [width, height] => {
                config.width = width;
                config.height = height;
            }
            _ => return Err("expected both WIDTH and HEIGHT, or neither".to_string()),
        }
        if config.width == 0 || config.height == 0 {
            return Err("maze dimensions must be at least 1x1".to_string());
        }
        Ok(config)
    }
}

fn parse_coord(value: &str) -> Result<(u16, u16), String> {
    let error = || format!("invalid coordinate (expected X,Y): {value}");
    let (x, y) = value.split_once(',').ok_or_else(error)?;
    Ok((
        x.trim().parse().map_err(|_| error())?,
        y.trim().parse().map_err(|_| error())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<AppConfig, String> {
        AppConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults_without_arguments() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_full_command_line() {
        let config = parse(&["--seed", "42", "--origin", "3,4", "--batch", "30", "12"]).unwrap();
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 12);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.origin, Some((3, 4)));
        assert!(config.batch);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--seed"]).is_err());
        assert!(parse(&["--origin", "3"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["30"]).is_err());
        assert!(parse(&["0", "5"]).is_err());
        assert!(parse(&["abc", "5"]).is_err());
    }
}
