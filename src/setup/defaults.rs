//! Embedded starter playbooks.
//!
//! These are the templates `briefer init` copies into a workspace for users
//! to customize. Query templates may use `{task}` and `{package}`
//! placeholders; they are interpolated at briefing time.

/// A starter playbook and its path relative to the playbooks directory.
#[derive(Debug, Clone, Copy)]
pub struct StarterPlaybook {
    /// Destination path relative to the playbooks directory.
    pub path: &'static str,
    /// Full YAML contents.
    pub contents: &'static str,
}

/// Subdirectories created under the playbooks directory.
pub const STARTER_DIRS: &[&str] = &["system", "tasks", "domains", "policies", "packages"];

/// The full starter set written by `init`.
pub const STARTER_PLAYBOOKS: &[StarterPlaybook] = &[
    StarterPlaybook {
        path: "system/base-directives.yml",
        contents: SYSTEM_BASE_DIRECTIVES,
    },
    StarterPlaybook {
        path: "tasks/fix-imports.yml",
        contents: TASK_FIX_IMPORTS,
    },
    StarterPlaybook {
        path: "tasks/debug-failure.yml",
        contents: TASK_DEBUG_FAILURE,
    },
    StarterPlaybook {
        path: "domains/refactoring.yml",
        contents: DOMAIN_REFACTORING,
    },
    StarterPlaybook {
        path: "domains/testing.yml",
        contents: DOMAIN_TESTING,
    },
    StarterPlaybook {
        path: "policies/security.yml",
        contents: POLICY_SECURITY,
    },
    StarterPlaybook {
        path: "packages/example-service.yml",
        contents: PACKAGE_EXAMPLE_SERVICE,
    },
];

const SYSTEM_BASE_DIRECTIVES: &str = r#"id: "system.base-directives"
version: "1.0.0"
scope: "system"
priority: 1

metadata:
  author: "Briefer Team"
  tags: ["system", "core", "directives"]
  lastUpdated: "2026-08-01"

description: |
  Base system directives that apply to every agent operation.

strategies:
  - "Always verify before modifying: search the knowledge base first"
  - "Respect existing patterns: follow the architecture already in place"
  - "Minimize changes: make the smallest change necessary"
  - "Preserve functionality: never break existing tests"
  - "Document decisions: record notable choices where the project keeps them"

policies:
  allowWrite: true
  allowDelete: false
  restrictedPaths:
    - "**/*.lock"
    - "**/.git/**"

knowledgeIntegration:
  enabled: true
  queries:
    - "What architectural patterns does this codebase use?"
    - "Show similar implementations in the codebase"
  maxContextTokens: 1000
"#;

const TASK_FIX_IMPORTS: &str = r#"id: "task.fix-imports"
version: "1.0.0"
scope: "task"
priority: 3

metadata:
  author: "Briefer Team"
  tags: ["refactoring", "imports", "dependencies"]
  lastUpdated: "2026-08-01"

description: |
  Fix broken imports in a package by analyzing dependencies and updating import statements.

strategies:
  - "Analyze the package manifest for declared dependencies"
  - "Scan for broken imports"
  - "Resolve correct import paths"
  - "Update import statements"
  - "Validate with the project's build"

checks:
  - id: "no-circular-deps"
    description: "Ensure no circular dependencies introduced"
  - id: "no-broken-imports"
    description: "All imports must resolve"

policies:
  allowWrite: true
  allowDelete: false
  restrictedPaths:
    - "core/"

knowledgeIntegration:
  enabled: true
  queries:
    - "Where are similar import fixes implemented?"
    - "How are imports organized in {package}?"
  maxContextTokens: 2000
"#;

const TASK_DEBUG_FAILURE: &str = r#"id: "task.debug-failure"
version: "1.0.0"
scope: "task"
priority: 3

metadata:
  author: "Briefer Team"
  tags: ["debugging", "diagnostics", "troubleshooting"]
  lastUpdated: "2026-08-01"

description: |
  Diagnose a failing component by analyzing configuration, logs, and runtime behavior.

strategies:
  - "Reproduce the failure with the smallest possible input"
  - "Read the error output before changing anything"
  - "Inspect recent changes to the failing area"
  - "Add focused logging around the suspect path"
  - "Confirm the fix with the original reproduction"

knowledgeIntegration:
  enabled: true
  queries:
    - "What are common failure modes around {task}?"
    - "Where is error handling implemented for this area?"
  maxContextTokens: 2000
"#;

const DOMAIN_REFACTORING: &str = r#"id: "domain.refactoring"
version: "1.0.0"
scope: "domain"
priority: 2

metadata:
  author: "Briefer Team"
  tags: ["refactoring", "architecture", "patterns"]
  lastUpdated: "2026-08-01"

description: |
  Cross-cutting refactoring strategies for improving code quality and maintainability.

strategies:
  - "Identify code smells and anti-patterns"
  - "Extract reusable functions and modules"
  - "Apply the DRY principle consistently"
  - "Improve naming and clarity"
  - "Update tests to match changes"

policies:
  allowWrite: true
  allowDelete: false
  restrictedPaths:
    - "**/tests/**"

knowledgeIntegration:
  enabled: true
  queries:
    - "What refactoring patterns does this codebase use?"
  maxContextTokens: 2000
"#;

const DOMAIN_TESTING: &str = r#"id: "domain.testing"
version: "1.0.0"
scope: "domain"
priority: 2

metadata:
  author: "Briefer Team"
  tags: ["testing", "quality", "coverage"]
  lastUpdated: "2026-08-01"

description: |
  Testing strategies and best practices for ensuring code quality.

strategies:
  - "Write unit tests for all new functions"
  - "Add integration tests for workflows"
  - "Keep coverage from regressing"
  - "Use the project's standard test runner"
  - "Mock external dependencies appropriately"

knowledgeIntegration:
  enabled: true
  queries:
    - "Show testing patterns in this codebase"
  maxContextTokens: 1500
"#;

const POLICY_SECURITY: &str = r#"id: "policy.security"
version: "1.0.0"
scope: "policy"
priority: 5

metadata:
  author: "Briefer Team"
  tags: ["security", "safety", "constraints"]
  lastUpdated: "2026-08-01"

description: |
  Security policies and constraints for all operations.

policies:
  allowWrite: true
  allowDelete: false
  restrictedPaths:
    - "**/*.key"
    - "**/*.secret"
    - "**/.env"
    - "**/credentials.json"
  forbiddenActions:
    - "Commit secrets or API keys"
    - "Modify security-critical files without review"
    - "Bypass authentication or authorization"

checks:
  - id: "no-secrets"
    description: "Ensure no secrets in code or commits"
  - id: "secure-dependencies"
    description: "All dependencies must come from trusted sources"
"#;

const PACKAGE_EXAMPLE_SERVICE: &str = r#"id: "package.example-service"
version: "1.0.0"
scope: "package"
priority: 2

metadata:
  author: "Briefer Team"
  tags: ["example", "service"]
  lastUpdated: "2026-08-01"

description: |
  Package-specific instructions for working inside the example-service package.
  Copy this file per package and adjust.

strategies:
  - "Run the package's own test suite after changes"
  - "Keep the public API backward compatible"
  - "Record notable decisions in the package changelog"

knowledgeIntegration:
  enabled: true
  queries:
    - "How is {package} structured?"
  maxContextTokens: 2500
"#;

/// README written at the top of the playbooks directory.
pub const README: &str = r#"# Playbooks

Custom playbooks for this workspace.

## Directory Structure

- `system/` - System-wide directives and base instructions
- `tasks/` - Task-specific playbooks (e.g., fix-imports, debug-failure)
- `domains/` - Cross-cutting domain strategies (e.g., refactoring, testing)
- `packages/` - Package-specific instructions
- `policies/` - Behavioral constraints and security policies

## Playbook Format

Each playbook is a YAML file with the following structure:

```yaml
id: "task.example"
version: "1.0.0"
scope: "task"
priority: 3

metadata:
  author: "Your Team"
  tags: ["example", "task"]
  lastUpdated: "2026-08-01"

description: |
  Description of what this playbook does.

strategies:
  - "Step 1: Do something"
  - "Step 2: Do something else"

checks:
  - id: "validation-1"
    description: "Ensure something is valid"

policies:
  allowWrite: true
  allowDelete: false
  restrictedPaths:
    - "critical/**"
  forbiddenActions:
    - "dangerous operation"

knowledgeIntegration:
  enabled: true
  queries:
    - "Where is similar code?"
    - "How does {package} handle {task}?"
  maxContextTokens: 2000
```

`scope` is one of `system`, `policy`, `package`, `domain`, `task`; `priority`
runs from 1 to 5. Query templates may use `{task}` and `{package}`
placeholders.

## Usage

```bash
# List all playbooks
briefer list

# Resolve the playbook for a task
briefer resolve --task "fix broken imports"

# Build the full prompt with knowledge context
briefer build-prompt --task "refactor module" --package "example-service"
```

## Configuration

The playbooks directory name and the external knowledge command can be
changed in `~/.config/briefer/config.toml`.
"#;
