use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Scope;
use crate::store::TemplateStore;

pub fn run<S: TemplateStore>(store: &mut S, scope: Scope) -> Result<CmdResult> {
    let report = store.doctor(scope)?;
    let mut result = CmdResult::default();

    if report.is_clean() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
        return Ok(result);
    }

    if report.fixed_missing_files > 0 || report.recovered_files > 0 {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
    }
    if report.fixed_missing_files > 0 {
        result.add_message(CmdMessage::info(format!(
            "  - Removed {} template(s) listed in the index but missing from disk.",
            report.fixed_missing_files
        )));
    }
    if report.recovered_files > 0 {
        result.add_message(CmdMessage::success(format!(
            "  - Recovered {} template(s) found on disk but missing from the index.",
            report.recovered_files
        )));
    }
    for path in &report.unreadable_files {
        result.add_message(CmdMessage::error(format!(
            "Unreadable template file left in place: {}",
            path.display()
        )));
    }

    Ok(result)
}
