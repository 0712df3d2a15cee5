/// Wrap a script in a single anonymous PL/pgSQL block so a multi-statement
/// script runs as one statement on the server.
///
/// The dollar-quote tag is chosen so it never occurs in the body.
pub fn wrap_in_block(script: &str) -> String {
    let tag = dollar_tag_for(script);
    let body = terminate_last_statement(script.trim());
    format!("DO {tag}\nBEGIN\n{body}\nEND\n{tag};", tag = tag, body = body)
}

/// Make sure the last statement ends with `;` before `END`.
///
/// Trailing `--` comments and blank lines are skipped, and the terminator
/// goes after the code on the last line that has any.
fn terminate_last_statement(body: &str) -> String {
    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();

    let last_code = lines.iter().enumerate().rev().find_map(|(i, line)| {
        let code = code_before_comment(line).trim_end();
        (!code.is_empty()).then_some((i, code.len()))
    });

    if let Some((i, end)) = last_code {
        if !lines[i][..end].ends_with(';') {
            lines[i].insert(end, ';');
        }
    }
    lines.join("\n")
}

/// The part of a line before a `--` comment that is not inside a string literal.
fn code_before_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '-' if !in_string && line[i..].starts_with("--") => return &line[..i],
            _ => {}
        }
    }
    line
}

fn dollar_tag_for(script: &str) -> String {
    let mut tag = "$onward$".to_string();
    let mut n = 0u32;
    while script.contains(&tag) {
        n += 1;
        tag = format!("$onward_{}$", n);
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_body() {
        let sql = wrap_in_block("CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);\n");
        assert_eq!(
            sql,
            "DO $onward$\nBEGIN\nCREATE TABLE a (id INT);\nCREATE TABLE b (id INT);\nEND\n$onward$;"
        );
    }

    #[test]
    fn test_terminates_last_statement() {
        let sql = wrap_in_block("UPDATE t SET a = 1");
        assert!(sql.contains("BEGIN\nUPDATE t SET a = 1;\nEND"));

        let sql = wrap_in_block("   ");
        assert_eq!(sql, "DO $onward$\nBEGIN\n\nEND\n$onward$;");
    }

    #[test]
    fn test_terminator_goes_before_trailing_comment() {
        let sql = wrap_in_block("ALTER TABLE t ADD c INT -- add column");
        assert!(sql.contains("BEGIN\nALTER TABLE t ADD c INT; -- add column\nEND"));

        let sql = wrap_in_block("UPDATE t SET a = 1\n-- done\n\n-- really");
        assert!(sql.contains("UPDATE t SET a = 1;\n-- done\n\n-- really\nEND"));
    }

    #[test]
    fn test_terminated_script_with_trailing_comment_is_untouched() {
        let sql = wrap_in_block("SELECT 1; -- one\n-- header only");
        assert!(sql.contains("BEGIN\nSELECT 1; -- one\n-- header only\nEND"));

        let sql = wrap_in_block("-- Migration 3: init\n-- nothing yet");
        assert!(sql.contains("BEGIN\n-- Migration 3: init\n-- nothing yet\nEND"));
    }

    #[test]
    fn test_dashes_inside_string_are_not_a_comment() {
        let sql = wrap_in_block("INSERT INTO t VALUES ('a--b')");
        assert!(sql.contains("INSERT INTO t VALUES ('a--b');\nEND"));
    }

    #[test]
    fn test_tag_avoids_collision() {
        let body = "PERFORM '$onward$'; PERFORM '$onward_1$';";
        let sql = wrap_in_block(body);
        assert!(sql.starts_with("DO $onward_2$\n"));
        assert!(sql.ends_with("$onward_2$;"));
    }

    #[test]
    fn test_plain_double_dollar_in_body_is_untouched() {
        let body = "EXECUTE $$SELECT 1$$;";
        let sql = wrap_in_block(body);
        assert!(sql.contains("EXECUTE $$SELECT 1$$;"));
        assert!(sql.starts_with("DO $onward$"));
    }
}
