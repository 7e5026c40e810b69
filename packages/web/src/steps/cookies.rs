use std::collections::BTreeSet;

use stepweave_core::{Table, TestContext, VariableScope};

use crate::browser::BrowserCookie;
use crate::error::Result;
use crate::session::WebSession;

const DEFAULT_COOKIE_PATH: &str = "/";

/// Steps on cookies of the current browser domain.
///
/// Mutating steps take `refresh`: whether to reload the page afterwards so it
/// picks the change up.
pub struct WebCookieSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> WebCookieSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I set cookie with name `$name` and value `$value` ``
    pub async fn set_cookie(&mut self, name: &str, value: &str, refresh: bool) -> Result<()> {
        let cookie = BrowserCookie::new(self.context.resolve(name), self.context.resolve(value))
            .with_path(DEFAULT_COOKIE_PATH);
        tracing::info!(name = %cookie.name, "setting cookie");
        self.session.browser.add_cookie(cookie).await?;
        self.refresh_if(refresh).await
    }

    /// `When I set cookies: $table`
    ///
    /// Columns: `name`, `value`, and optional `path` (default `/`) and `domain`.
    pub async fn set_cookies(&mut self, table: &Table, refresh: bool) -> Result<()> {
        let mut cookies = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let name = self.context.resolve(table.required(row, "name")?);
            let value = self.context.resolve(table.required(row, "value")?);
            let path = table
                .cell(row, "path")
                .filter(|path| !path.is_empty())
                .map(|path| self.context.resolve(path))
                .unwrap_or_else(|| DEFAULT_COOKIE_PATH.to_string());
            let mut cookie = BrowserCookie::new(name, value).with_path(path);
            if let Some(domain) = table.cell(row, "domain").filter(|d| !d.is_empty()) {
                cookie = cookie.with_domain(self.context.resolve(domain));
            }
            cookies.push(cookie);
        }

        tracing::info!(count = cookies.len(), "setting cookies");
        for cookie in cookies {
            self.session.browser.add_cookie(cookie).await?;
        }
        self.refresh_if(refresh).await
    }

    /// ``When I remove cookie with name `$name` ``
    pub async fn remove_cookie(&mut self, name: &str, refresh: bool) -> Result<()> {
        let name = self.context.resolve(name);
        tracing::info!(%name, "removing cookie");
        self.session.browser.delete_cookie(&name).await?;
        self.refresh_if(refresh).await
    }

    /// `When I remove all cookies`
    pub async fn remove_all_cookies(&mut self, refresh: bool) -> Result<()> {
        tracing::info!("removing all cookies");
        self.session.browser.delete_all_cookies().await?;
        self.refresh_if(refresh).await
    }

    /// ``Then cookie with name `$name` is set``
    pub async fn cookie_is_set(&mut self, name: &str) -> Result<bool> {
        let name = self.context.resolve(name);
        let present = self.find(&name).await?.is_some();
        Ok(self
            .context
            .soft_assert()
            .assert_true(&format!("Cookie with name '{name}' is set"), present))
    }

    /// ``Then cookie with name `$name` is not set``
    pub async fn cookie_is_not_set(&mut self, name: &str) -> Result<bool> {
        let name = self.context.resolve(name);
        let present = self.find(&name).await?.is_some();
        Ok(self
            .context
            .soft_assert()
            .assert_false(&format!("Cookie with name '{name}' is not set"), present))
    }

    /// ``When I save value of cookie with name `$name` to $scopes variable `$var` ``
    pub async fn save_cookie_value(
        &mut self,
        name: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let name = self.context.resolve(name);
        let variable = self.context.resolve(variable);
        match self.find(&name).await? {
            Some(cookie) => {
                self.context
                    .variables_mut()
                    .put_string(scopes, &variable, cookie.value)?;
            }
            None => self.context.soft_assert().record_failure(
                &format!("Cookie with name '{name}' is set"),
                "cookie is not present",
            ),
        }
        Ok(())
    }

    async fn find(&self, name: &str) -> Result<Option<BrowserCookie>> {
        let cookies = self.session.browser.cookies().await?;
        Ok(cookies.into_iter().find(|cookie| cookie.name == name))
    }

    async fn refresh_if(&mut self, refresh: bool) -> Result<()> {
        if refresh {
            self.session.browser.refresh().await?;
            self.session.contexts.reset();
        }
        Ok(())
    }
}
