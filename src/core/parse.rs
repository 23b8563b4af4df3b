/// One command line split into what the dispatcher needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub background: bool,
    /// Text the job is reported under: the line without its `&` marker.
    pub line: String,
}

/// Whitespace tokens together with their byte offset in `line`.
fn tokens(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let base = line.as_ptr() as usize;
    line.split_whitespace()
        .map(move |token| (token.as_ptr() as usize - base, token))
}

/// The line with every bare `&` token cut out. A trailing marker leaves the
/// text before it untouched apart from the whitespace in front of the `&`.
fn strip_background(line: &str) -> (String, bool) {
    let mut kept = Vec::new();
    let mut start = 0;
    let mut background = false;
    for (offset, token) in tokens(line) {
        if token == "&" {
            background = true;
            kept.push(line[start..offset].trim());
            start = offset + token.len();
        }
    }
    if !background {
        return (line.to_string(), false);
    }
    kept.push(line[start..].trim());
    let stripped: Vec<&str> = kept.into_iter().filter(|s| !s.is_empty()).collect();
    (stripped.join(" "), true)
}

/// Splits a line into program, arguments, redirect targets and the background
/// flag. `<` and `>` take the next token as their file; a trailing operator
/// with nothing after it is dropped. Returns `None` when no program is left.
pub fn parse(line: &str) -> Option<ParsedCommand> {
    let (line, background) = strip_background(line.trim());

    let mut words = Vec::new();
    let mut input = None;
    let mut output = None;
    let mut iter = line.split_whitespace();
    while let Some(token) = iter.next() {
        match token {
            "<" => {
                if let Some(path) = iter.next() {
                    input = Some(path.to_string());
                }
            }
            ">" => {
                if let Some(path) = iter.next() {
                    output = Some(path.to_string());
                }
            }
            word => words.push(word.to_string()),
        }
    }

    let mut words = words.into_iter();
    let program = words.next()?;
    Some(ParsedCommand {
        program,
        args: words.collect(),
        input,
        output,
        background,
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_command() {
        let cmd = parse("ls -l /tmp").unwrap();
        assert_eq!(cmd.program, "ls");
        assert_eq!(cmd.args, vec!["-l", "/tmp"]);
        assert!(!cmd.background);
        assert_eq!(cmd.input, None);
        assert_eq!(cmd.output, None);
        assert_eq!(cmd.line, "ls -l /tmp");
    }

    #[test]
    fn test_background_keeps_line_verbatim() {
        let cmd = parse("sleep   5 \t &  ").unwrap();
        assert!(cmd.background);
        assert_eq!(cmd.line, "sleep   5");
        assert_eq!(cmd.args, vec!["5"]);
    }

    #[test]
    fn test_ampersand_needs_whitespace() {
        let cmd = parse("sleep 5&").unwrap();
        assert!(!cmd.background);
        assert_eq!(cmd.args, vec!["5&"]);
    }

    #[test]
    fn test_redirects_removed_from_args() {
        let cmd = parse("sort < in.txt > out.txt -r").unwrap();
        assert_eq!(cmd.program, "sort");
        assert_eq!(cmd.args, vec!["-r"]);
        assert_eq!(cmd.input.as_deref(), Some("in.txt"));
        assert_eq!(cmd.output.as_deref(), Some("out.txt"));
    }

    #[test]
    fn test_redirect_and_background_any_order() {
        let cmd = parse("cat < a & > b").unwrap();
        assert!(cmd.background);
        assert_eq!(cmd.line, "cat < a > b");
        assert_eq!(cmd.input.as_deref(), Some("a"));
        assert_eq!(cmd.output.as_deref(), Some("b"));
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_dangling_operator_ignored() {
        let cmd = parse("echo hi >").unwrap();
        assert_eq!(cmd.args, vec!["hi"]);
        assert_eq!(cmd.output, None);

        let cmd = parse("cat <").unwrap();
        assert_eq!(cmd.input, None);
    }

    #[test]
    fn test_nothing_to_run() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("&"), None);
        assert_eq!(parse("> out.txt"), None);
    }

    #[test]
    fn test_status_token_untouched() {
        let cmd = parse("echo $?").unwrap();
        assert_eq!(cmd.args, vec!["$?"]);
    }
}
