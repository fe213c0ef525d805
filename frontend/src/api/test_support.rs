use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use httpmock::MockServer;

use crate::api::{auth::AuthContext, client::ApiClient};

/// Auth context with a scripted sequence of refresh outcomes.
///
/// Each refresh pops the next outcome: `Some(token)` succeeds and stores the
/// token, `None` fails. Once the script runs out every refresh fails.
#[derive(Debug, Default)]
pub struct FakeAuth {
    token: RefCell<Option<String>>,
    script: RefCell<VecDeque<Option<String>>>,
    refresh_calls: Cell<usize>,
}

impl FakeAuth {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
            ..Self::default()
        }
    }

    pub fn without_token() -> Self {
        Self::default()
    }

    pub fn then_refresh_to(self, token: &str) -> Self {
        self.script.borrow_mut().push_back(Some(token.to_string()));
        self
    }

    pub fn then_fail_refresh(self) -> Self {
        self.script.borrow_mut().push_back(None);
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.get()
    }

    pub fn current_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }
}

#[async_trait(?Send)]
impl AuthContext for FakeAuth {
    fn access_token(&self) -> Option<String> {
        self.current_token()
    }

    async fn refresh_access_token(&self) -> bool {
        self.refresh_calls.set(self.refresh_calls.get() + 1);
        // Suspend like a real refresh so concurrent callers interleave here.
        tokio::task::yield_now().await;
        let outcome = self.script.borrow_mut().pop_front().flatten();
        match outcome {
            Some(token) => {
                *self.token.borrow_mut() = Some(token);
                true
            }
            None => false,
        }
    }
}

pub fn client_for(server: &MockServer, auth: &Rc<FakeAuth>) -> ApiClient {
    ApiClient::new_with_base_url(server.base_url(), auth.clone())
}

pub fn authed_client(server: &MockServer) -> (ApiClient, Rc<FakeAuth>) {
    let auth = Rc::new(FakeAuth::with_token("t1"));
    (client_for(server, &auth), auth)
}
