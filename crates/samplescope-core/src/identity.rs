/// Display identity of a sampling strategy in result tables.
///
/// The alias, when present, distinguishes otherwise identical strategy
/// instances: `StratifiedSampling[by_region]`.
pub fn strategy_identity(name: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) if !alias.is_empty() => format!("{name}[{alias}]"),
        _ => name.to_string(),
    }
}
