use ferment_syntax::error::Error;
use owo_colors::OwoColorize;

pub fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = String::new();
            marker.push_str(&" ".repeat(line_num_str.len()));
            if col > 1 {
                marker.push_str(&" ".repeat(col - 1));
            }
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.msg);
}

pub fn provide_error_suggestions(err_msg: &str) {
    if err_msg.contains("after 'postavi'") {
        eprintln!("{}", "Help: 'postavi' must be followed by a variable name.".yellow());
        eprintln!("    {}", "Example: postavi x = 5;".bright_black());
    } else if err_msg.contains("'=' after identifier") {
        eprintln!("{}", "Help: Bind a value to the name with '='.".yellow());
        eprintln!("    {}", "Example: postavi brojac = 0;".bright_black());
    } else if err_msg.contains("after 'ako'") || err_msg.contains("')' after condition") {
        eprintln!("{}", "Help: The condition of 'ako' goes in parentheses.".yellow());
        eprintln!("    {}", "Example: ako (x > y) { ispisi x; }".bright_black());
        eprintln!(
            "    {}",
            "Only + - * / < > combine values; '==' and '!=' are not expression operators.".bright_black()
        );
    } else if err_msg.contains("'{' after") {
        eprintln!("{}", "Help: Conditions are followed by a block in braces.".yellow());
        eprintln!("    {}", "Example: dok x < 10 { postavi x = x + 1; }".bright_black());
    } else if err_msg.contains("to close block") {
        eprintln!("{}", "Help: Every '{' needs a matching '}'.".yellow());
    } else if err_msg.contains("closing ')'") {
        eprintln!("{}", "Help: Check that parentheses are balanced.".yellow());
    } else if err_msg.contains("expected expression") {
        eprintln!(
            "{}",
            "Help: Expected a name, a number, a string or a parenthesized expression.".yellow()
        );
    } else if err_msg.contains("illegal character") {
        eprintln!("{}", "Help: Names may only contain letters.".yellow());
        eprintln!("    {}", "Example: postavi brojac = 1; (not brojac1 or moj_broj)".bright_black());
    } else if err_msg.contains("nested too deeply") {
        eprintln!("{}", "Help: Split deeply nested code into separate statements.".yellow());
    } else if err_msg.contains("too many operators") {
        eprintln!(
            "{}",
            "Help: Break the expression up with intermediate 'postavi' bindings.".yellow()
        );
    } else if err_msg.contains("unterminated string") {
        eprintln!("{}", "Help: String is missing closing quote.".yellow());
        eprintln!("    {}", "Make sure every \" has a matching closing \"".bright_black());
    }
}
