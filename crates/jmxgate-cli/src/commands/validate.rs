use anyhow::{Context, Result};
use jmxgate_restrictor::{PolicyModel, ResourceRuleIndex, load_policy};

use crate::cli::ValidateArgs;
use crate::output::{print_field, print_success, restriction_list};

pub fn validate(args: &ValidateArgs) -> Result<()> {
    let restrictor = load_policy(&args.policy)
        .with_context(|| format!("invalid policy {}", args.policy.display()))?;

    print_success(&format!("Policy {} is valid", args.policy.display()));
    print_summary(restrictor.model());
    Ok(())
}

fn print_summary(model: &PolicyModel) {
    print_field(
        "Commands",
        &restriction_list(
            model
                .allowed_types()
                .map(|types| types.iter().map(ToString::to_string)),
        ),
    );
    print_field(
        "HTTP methods",
        &restriction_list(
            model
                .allowed_http_methods()
                .map(|methods| methods.iter().map(ToString::to_string)),
        ),
    );
    print_field("Allow rules", &rule_summary(model.allow_rules()));
    print_field("Deny rules", &rule_summary(model.deny_rules()));

    let remote = match (model.allowed_hosts(), model.allowed_subnets()) {
        (None, None) => None,
        (hosts, subnets) => Some(
            hosts
                .into_iter()
                .flatten()
                .cloned()
                .chain(subnets.into_iter().flatten().map(|s| s.network().to_string())),
        ),
    };
    print_field("Remote", &restriction_list(remote));

    let origins = model.allowed_origins();
    print_field(
        "Origins",
        &restriction_list(
            (!origins.is_empty()).then(|| origins.iter().map(|o| o.as_str().to_string())),
        ),
    );
    print_field(
        "Strict origin checking",
        if model.strict_origin_checking() { "on" } else { "off" },
    );
}

fn rule_summary(rules: Option<&ResourceRuleIndex>) -> String {
    match rules {
        None => "(none)".to_string(),
        Some(rules) => format!(
            "{} MBean name(s), {} pattern(s)",
            rules.len(),
            rules.patterns().count()
        ),
    }
}
