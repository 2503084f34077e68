pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "open",
        aliases: &["o"],
        description: "Open a history record (e.g. :open 42)",
    },
    CommandDef {
        name: "from",
        aliases: &[],
        description: "Only show records on or after a date (e.g. :from 2024-11-01)",
    },
    CommandDef {
        name: "until",
        aliases: &[],
        description: "Only show records on or before a date (e.g. :until 2024-11-30)",
    },
    CommandDef {
        name: "clear",
        aliases: &[],
        description: "Clear search text and date bounds",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        description: "Quit histview",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        description: "Show help",
    },
];

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_commands() {
        assert_eq!(matching_commands("o").len(), 1);
        assert_eq!(matching_commands("o")[0].name, "open");

        assert_eq!(matching_commands("f").len(), 1);
        assert_eq!(matching_commands("f")[0].name, "from");

        assert_eq!(matching_commands("u")[0].name, "until");
        assert_eq!(matching_commands("cl")[0].name, "clear");

        assert_eq!(matching_commands("q").len(), 1);
        assert_eq!(matching_commands("h")[0].name, "help");

        assert_eq!(matching_commands("").len(), COMMANDS.len());
        assert!(matching_commands("xyz").is_empty());
    }
}
