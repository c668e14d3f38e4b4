use colored::Colorize;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_field(label: &str, value: &str) {
    println!("{}: {}", label.cyan(), value);
}

pub fn print_decision(allowed: bool) {
    if allowed {
        println!("{}", "allowed".green());
    } else {
        println!("{}", "denied".red());
    }
}

/// Render an optional restriction list, `None` meaning the section is absent.
pub fn restriction_list<I>(items: Option<I>) -> String
where
    I: IntoIterator<Item = String>,
{
    match items {
        None => "(unrestricted)".to_string(),
        Some(items) => {
            let mut items: Vec<String> = items.into_iter().collect();
            if items.is_empty() {
                return "(none)".to_string();
            }
            items.sort();
            items.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restriction_list() {
        assert_eq!(restriction_list(None::<Vec<String>>), "(unrestricted)");
        assert_eq!(restriction_list(Some(Vec::<String>::new())), "(none)");
        assert_eq!(
            restriction_list(Some(vec!["read".to_string(), "list".to_string()])),
            "list, read"
        );
    }
}
