// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Env, OsEnv};
use std::fmt::Debug;
use std::sync::Arc;

/// Context provides the environment used while loading signer configuration.
///
/// Signing itself never touches the context: it is pure computation over the
/// signing context. Only configuration loaders read from here.
///
/// ## Example
///
/// ```
/// use ossign_core::{Context, StaticEnv};
///
/// let ctx = Context::new().with_env(StaticEnv::from_pairs([("ALIBABA_CLOUD_OSS_REGION", "cn-hangzhou")]));
/// assert_eq!(ctx.env_var("ALIBABA_CLOUD_OSS_REGION").as_deref(), Some("cn-hangzhou"));
/// ```
#[derive(Clone)]
pub struct Context {
    env: Arc<dyn Env>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("env", &self.env).finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context reading from the process environment.
    pub fn new() -> Self {
        Self {
            env: Arc::new(OsEnv),
        }
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Get the environment variable.
    ///
    /// Empty values are treated as unset.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticEnv;

    #[test]
    fn test_env_var_ignores_empty_values() {
        let ctx = Context::new().with_env(StaticEnv::from_pairs([("A", "1"), ("B", "")]));

        assert_eq!(ctx.env_var("A").as_deref(), Some("1"));
        assert_eq!(ctx.env_var("B"), None);
        assert_eq!(ctx.env_var("C"), None);
    }
}
