use anyhow::{Context, Result};
use jmxgate_core::{HttpMethod, ObjectName, RequestType};
use jmxgate_restrictor::{Restrictor, load_policy};

use crate::cli::{CheckArgs, Query};
use crate::output::print_decision;

/// Evaluate the query and print the decision. Returns whether it was allowed.
pub fn check(args: &CheckArgs) -> Result<bool> {
    let restrictor = load_policy(&args.policy)
        .with_context(|| format!("invalid policy {}", args.policy.display()))?;

    let allowed = evaluate(&restrictor, &args.query)?;
    tracing::debug!(allowed, "Query evaluated");
    print_decision(allowed);
    Ok(allowed)
}

pub fn evaluate(restrictor: &dyn Restrictor, query: &Query) -> Result<bool> {
    let allowed = match query {
        Query::Type { request_type } => {
            let request_type: RequestType = request_type.parse()?;
            restrictor.is_type_allowed(request_type)
        }
        Query::Http { method } => {
            let method: HttpMethod = method.parse()?;
            restrictor.is_http_method_allowed(method)
        }
        Query::Read { mbean, attribute } => {
            restrictor.is_attribute_read_allowed(&parse_mbean(mbean)?, attribute)
        }
        Query::Write { mbean, attribute } => {
            restrictor.is_attribute_write_allowed(&parse_mbean(mbean)?, attribute)
        }
        Query::Exec { mbean, operation } => {
            restrictor.is_operation_allowed(&parse_mbean(mbean)?, operation)
        }
        Query::Remote { hosts_or_addresses } => {
            let candidates: Vec<&str> = hosts_or_addresses.iter().map(String::as_str).collect();
            restrictor.is_remote_access_allowed(&candidates)
        }
        Query::Origin { origin, strict } => {
            if *strict {
                restrictor.is_origin_allowed_strict(origin)
            } else {
                restrictor.is_origin_allowed(origin)
            }
        }
    };
    Ok(allowed)
}

fn parse_mbean(mbean: &str) -> Result<ObjectName> {
    let name: ObjectName = mbean.parse()?;
    if name.is_pattern() {
        anyhow::bail!("'{mbean}' is a pattern; queries need a concrete MBean name");
    }
    Ok(name)
}
