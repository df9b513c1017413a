// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted [`CommandRunner`] for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use futures_util::future::BoxFuture;

use super::runner::CommandRunner;
use crate::core::process::builder::ExecutionResult;
use crate::error::StageResult;

pub(crate) const FAKE_COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

/// Operation name of an argument vector, skipping leading `-c` pairs.
///
/// `remote`, `submodule` and `config --get` include their second word.
pub(crate) fn operation_of(args: &[String]) -> String {
    let mut rest = args;
    while rest.first().is_some_and(|a| a == "-c") {
        rest = rest.get(2..).unwrap_or_default();
    }
    match rest {
        [first, second, ..] if first == "remote" || first == "submodule" => {
            format!("{first} {second}")
        }
        [first, second, ..] if first == "config" && second == "--get" => {
            "config --get".to_string()
        }
        [first, ..] => first.clone(),
        [] => String::new(),
    }
}

/// Records every invocation and answers from a script.
///
/// Unscripted operations succeed with empty output, except `version`
/// and `log` (canned output) and `config --get` (unset).
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    calls: Mutex<Vec<Vec<String>>>,
    exit_codes: BTreeMap<String, i32>,
    stdout: BTreeMap<String, String>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes `operation` exit with `code`.
    pub(crate) fn fail(mut self, operation: &str, code: i32) -> Self {
        self.exit_codes.insert(operation.to_string(), code);
        self
    }

    /// Makes `operation` print `stdout`.
    pub(crate) fn respond(mut self, operation: &str, stdout: &str) -> Self {
        self.stdout.insert(operation.to_string(), stdout.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn operations(&self) -> Vec<String> {
        self.calls().iter().map(|args| operation_of(args)).collect()
    }

    /// The first recorded invocation of `operation`.
    pub(crate) fn call(&self, operation: &str) -> Option<Vec<String>> {
        self.calls()
            .into_iter()
            .find(|args| operation_of(args) == operation)
    }

    fn answer(&self, args: &[String]) -> ExecutionResult {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(args.to_vec());
        }
        let operation = operation_of(args);
        let stdout = self.stdout.get(&operation).cloned().unwrap_or_else(|| {
            match operation.as_str() {
                "version" => "git version 2.45.1\n".to_string(),
                "log" => format!("{FAKE_COMMIT}\n"),
                _ => String::new(),
            }
        });
        let default_code = if operation == "config --get" && !self.stdout.contains_key(&operation)
        {
            1
        } else {
            0
        };
        let code = self
            .exit_codes
            .get(&operation)
            .copied()
            .unwrap_or(default_code);
        ExecutionResult::new(code, stdout, String::new())
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_captured<'a>(
        &'a self,
        args: &'a [String],
    ) -> BoxFuture<'a, StageResult<ExecutionResult>> {
        Box::pin(async move { Ok(self.answer(args)) })
    }

    fn run_streamed<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, StageResult<i32>> {
        Box::pin(async move { Ok(self.answer(args).exit_code()) })
    }
}
