//! Pull request body rendering using Jinja2-compatible syntax.
//!
//! # Available Variables
//!
//! - `summary`: issue summary
//! - `description`: issue description (empty string if not present)
//! - `issue_type`: issue type name, e.g. `Story` or `Bug`
//! - `jira_url`: browser URL of the issue

use minijinja::{Environment, context};

use crate::error::AutomationError;

/// Template used when no custom template is configured.
pub const DEFAULT_PULL_REQUEST_TEMPLATE: &str = "\
## [{{ summary }}]({{ jira_url }})

**{{ issue_type }}**
{% if description %}
{{ description }}
{% endif %}
### Checklist

- [ ] Tests cover the change
- [ ] The issue is linked in the title
";

/// Values exposed to the pull request template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestTemplateVars<'a> {
    /// Issue summary.
    pub summary: &'a str,
    /// Issue description.
    pub description: Option<&'a str>,
    /// Issue type name.
    pub issue_type: &'a str,
    /// Browser URL of the issue.
    pub jira_url: &'a str,
}

/// Renders a pull request body from `template_content`.
///
/// # Errors
///
/// Returns [`AutomationError::Template`] if the template has syntax errors or
/// fails to render.
pub fn render_pull_request_body(
    template_content: &str,
    vars: &PullRequestTemplateVars<'_>,
) -> Result<String, AutomationError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    env.add_template("pull_request", template_content)
        .map_err(|e| AutomationError::Template {
            message: format!("invalid template syntax: {e}"),
        })?;

    let ctx = context! {
        summary => vars.summary,
        description => vars.description.unwrap_or_default(),
        issue_type => vars.issue_type,
        jira_url => vars.jira_url,
    };

    env.get_template("pull_request")
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|e| AutomationError::Template {
            message: format!("template rendering failed: {e}"),
        })
}
