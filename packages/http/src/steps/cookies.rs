use std::collections::BTreeSet;

use stepweave_core::{TestContext, VariableScope};

use crate::error::Result;
use crate::session::HttpSession;

/// Steps on cookies collected from HTTP responses.
pub struct HttpCookieSteps<'a> {
    session: &'a mut HttpSession,
    context: &'a mut TestContext,
}

impl<'a> HttpCookieSteps<'a> {
    pub fn new(session: &'a mut HttpSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I save value of HTTP cookie with name `$name` to $scopes variable `$var` ``
    pub fn save_cookie_value(
        &mut self,
        name: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let name = self.context.resolve(name);
        let variable = self.context.resolve(variable);
        let Some(cookie) = self.session.cookies.get(&name) else {
            self.context.soft_assert().record_failure(
                &format!("HTTP cookie with name '{name}' is set"),
                "cookie is not present",
            );
            return Ok(());
        };
        let value = cookie.value.clone();
        self.context.variables_mut().put_string(scopes, &variable, value)?;
        Ok(())
    }

    /// ``When I remove HTTP cookie with name `$name` ``
    pub fn remove_cookie(&mut self, name: &str) {
        let name = self.context.resolve(name);
        let removed = self.session.cookies.remove(&name);
        tracing::info!(%name, removed, "removing HTTP cookie");
    }

    /// `When I clear HTTP cookies`
    pub fn clear_cookies(&mut self) {
        tracing::info!(count = self.session.cookies.all().len(), "clearing HTTP cookies");
        self.session.cookies.clear();
    }

    /// ``Then HTTP cookie with name `$name` is set``
    pub fn cookie_is_set(&mut self, name: &str) -> bool {
        let name = self.context.resolve(name);
        let present = self.session.cookies.get(&name).is_some();
        self.context
            .soft_assert()
            .assert_true(&format!("HTTP cookie with name '{name}' is set"), present)
    }
}
