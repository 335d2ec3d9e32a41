//! Tests for the executor module.

use std::{fs, io, path::Path, sync::Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::{
    fs::LocalFileSystem,
    models::{metadata, StepStatus},
};

const CORE_PROJECT: &str =
    "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>net8.0</TargetFramework>\n  </PropertyGroup>\n</Project>\n";

const WEB_PROJECT: &str = "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>net8.0</TargetFramework>\n  </PropertyGroup>\n  <ItemGroup>\n    <ProjectReference Include=\"..\\Core\\Core.csproj\" />\n  </ItemGroup>\n</Project>\n";

const APP_SOLUTION: &str = "Microsoft Visual Studio Solution File, Format Version 12.00\nProject(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Core\", \"src\\Core\\Core.csproj\", \"{A1}\"\nEndProject\nProject(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Web\", \"src\\Web\\Web.csproj\", \"{B2}\"\nEndProject\n";

const TOOLS_SOLUTION: &str = "Microsoft Visual Studio Solution File, Format Version 12.00\nProject(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Tools\", \"tools\\Tools.csproj\", \"{C3}\"\nEndProject\n";

/// Helper function to create a workspace and an executor rooted in it
async fn create_test_executor(dry_run: bool) -> (TempDir, Executor) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let executor = ExecutorBuilder::new()
        .with_workspace_root(Some(temp_dir.path()))
        .dry_run(dry_run)
        .build()
        .await
        .expect("Failed to create executor");
    (temp_dir, executor)
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent");
    }
    fs::write(path, contents).expect("Failed to write file");
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("Failed to read file")
}

fn plan_of(steps: Vec<Step>) -> Plan {
    Plan::new("Test Plan").with_steps(steps)
}

/// Local file system that records each call by name and can refuse every
/// mutating call with an I/O error.
struct RecordingFileSystem {
    inner: LocalFileSystem,
    calls: Mutex<Vec<&'static str>>,
    fail_mutations: bool,
}

impl RecordingFileSystem {
    fn new(fail_mutations: bool) -> Self {
        Self {
            inner: LocalFileSystem::new(),
            calls: Mutex::new(Vec::new()),
            fail_mutations,
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("Calls lock poisoned").push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("Calls lock poisoned").clone()
    }

    fn mutation(&self, call: &'static str, path: &Path) -> Result<()> {
        self.record(call);
        if self.fail_mutations {
            return Err(MigrationError::FileSystem {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for RecordingFileSystem {
    async fn exists(&self, path: &Path, cancel: &CancellationToken) -> Result<bool> {
        self.record("exists");
        self.inner.exists(path, cancel).await
    }

    async fn is_directory(&self, path: &Path, cancel: &CancellationToken) -> Result<bool> {
        self.record("is_directory");
        self.inner.is_directory(path, cancel).await
    }

    async fn read_file(&self, path: &Path, cancel: &CancellationToken) -> Result<String> {
        self.record("read_file");
        self.inner.read_file(path, cancel).await
    }

    async fn write_file(
        &self,
        path: &Path,
        contents: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.mutation("write_file", path)?;
        self.inner.write_file(path, contents, cancel).await
    }

    async fn move_path(
        &self,
        source: &Path,
        target: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.mutation("move_path", source)?;
        self.inner.move_path(source, target, cancel).await
    }

    async fn copy(
        &self,
        source: &Path,
        target: &Path,
        overwrite: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.mutation("copy", source)?;
        self.inner.copy(source, target, overwrite, cancel).await
    }

    async fn delete(&self, path: &Path, recursive: bool, cancel: &CancellationToken) -> Result<()> {
        self.mutation("delete", path)?;
        self.inner.delete(path, recursive, cancel).await
    }

    async fn get_files(
        &self,
        dir: &Path,
        pattern: &str,
        recursive: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        self.record("get_files");
        self.inner.get_files(dir, pattern, recursive, cancel).await
    }

    async fn get_directories(&self, dir: &Path, cancel: &CancellationToken) -> Result<Vec<PathBuf>> {
        self.record("get_directories");
        self.inner.get_directories(dir, cancel).await
    }
}

/// Executor over `root` whose file system calls go through `file_system`.
async fn create_recording_executor(
    root: &Path,
    dry_run: bool,
    file_system: &Arc<RecordingFileSystem>,
) -> Executor {
    ExecutorBuilder::new()
        .with_workspace_root(Some(root))
        .dry_run(dry_run)
        .with_file_system(file_system.clone())
        .build()
        .await
        .expect("Failed to create executor")
}

#[tokio::test]
async fn test_execute_stops_at_first_failure() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "A.cs", "class A {}");
    write(root, "C.cs", "class C {}");

    let plan = plan_of(vec![
        Step::new(Action::MoveFile, "A.cs", "B.cs"),
        Step::new(Action::MoveFile, "X.cs", "Y.cs"),
        Step::new(Action::MoveFile, "C.cs", "D.cs"),
    ]);
    let result = executor
        .execute(&plan, None, &CancellationToken::new())
        .await
        .expect("Execution should not be cancelled");

    assert!(!result.success);
    assert_eq!(result.step_results.len(), 2);
    assert_eq!(result.plan.status, PlanStatus::Failed);
    assert_eq!(result.plan.steps[0].status, StepStatus::Completed);
    assert_eq!(result.plan.steps[1].status, StepStatus::Failed);
    assert_eq!(result.plan.steps[2].status, StepStatus::Skipped);
    assert!(result.plan.steps[0].executed_at.is_some());
    assert!(result.plan.steps[2].executed_at.is_none());

    let error = result.error_message.expect("First failure should be reported");
    assert!(error.starts_with("Source file does not exist"));
    assert_eq!(result.plan.steps[1].error_message.as_deref(), Some(error.as_str()));

    assert!(root.join("B.cs").exists());
    assert!(root.join("C.cs").exists());
    assert!(!root.join("D.cs").exists());

    // Input plan is untouched
    assert!(plan.steps.iter().all(|s| s.status == StepStatus::Pending));
    assert_eq!(plan.status, PlanStatus::Draft);
}

#[tokio::test]
async fn test_execute_success_completes_plan() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "A.cs", "class A {}");

    let plan = plan_of(vec![
        Step::new(Action::CopyFile, "A.cs", "copies/A.cs"),
        Step::new(Action::MoveFile, "A.cs", "moved/A.cs"),
    ]);
    let result = executor
        .execute(&plan, None, &CancellationToken::new())
        .await
        .expect("Execution should not be cancelled");

    assert!(result.success);
    assert!(result.error_message.is_none());
    assert_eq!(result.plan.status, PlanStatus::Completed);
    assert_eq!(result.plan.modified_at, plan.modified_at);
    assert_eq!(read(root, "copies/A.cs"), "class A {}");
    assert_eq!(read(root, "moved/A.cs"), "class A {}");
    assert!(!root.join("A.cs").exists());
}

#[tokio::test]
async fn test_dry_run_move_file_changes_nothing() {
    let (temp_dir, executor) = create_test_executor(true).await;
    let root = temp_dir.path();
    write(root, "A.cs", "class A {}");

    let plan = plan_of(vec![Step::new(Action::MoveFile, "A.cs", "B.cs")]);
    let result = executor
        .execute(&plan, None, &CancellationToken::new())
        .await
        .expect("Execution should not be cancelled");

    assert!(result.success);
    assert!(root.join("A.cs").exists());
    assert!(!root.join("B.cs").exists());
    let message = result.step_results[0].message.as_deref().unwrap_or_default();
    assert!(message.starts_with("[DRY RUN] Would move file"));
}

#[tokio::test]
async fn test_dry_run_still_checks_preconditions() {
    let (temp_dir, executor) = create_test_executor(true).await;
    write(temp_dir.path(), "A.cs", "a");
    write(temp_dir.path(), "B.cs", "b");

    let result = executor
        .execute_step(
            &Step::new(Action::CopyFile, "A.cs", "B.cs"),
            &CancellationToken::new(),
        )
        .await
        .expect("Step should not be cancelled");

    assert!(!result.success);
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.starts_with("Target file already exists")));
}

#[tokio::test]
async fn test_dry_run_folder_preview_counts_contents() {
    let (temp_dir, executor) = create_test_executor(true).await;
    let root = temp_dir.path();
    write(root, "src/Core/A.cs", "a");
    write(root, "src/Core/Models/B.cs", "b");
    write(root, "src/Core/Models/C.cs", "c");

    let result = executor
        .execute_step(
            &Step::new(Action::CopyFolder, "src/Core", "lib/Core"),
            &CancellationToken::new(),
        )
        .await
        .expect("Step should not be cancelled");

    assert!(result.success);
    let message = result.message.unwrap_or_default();
    assert!(message.contains("3 files, 1 subdirectories"), "{message}");
    assert!(!root.join("lib").exists());
}

#[tokio::test]
async fn test_file_system_error_fails_step_and_skips_rest() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    write(root, "Widget.cs", "namespace Other;\n");
    write(root, "A.cs", "class A {}");
    write(root, "C.cs", "class C {}");
    let file_system = Arc::new(RecordingFileSystem::new(true));
    let executor = create_recording_executor(root, false, &file_system).await;

    let plan = plan_of(vec![
        Step::new(Action::RenameNamespace, "Widget.cs", "New.Ns")
            .with_metadata(metadata::OLD_NAMESPACE, "Old.Ns"),
        Step::new(Action::MoveFile, "A.cs", "B.cs"),
        Step::new(Action::CopyFile, "C.cs", "D.cs"),
        Step::new(Action::DeleteProject, "C.cs", ""),
    ]);
    let result = executor
        .execute(&plan, None, &CancellationToken::new())
        .await
        .expect("Execution should not be cancelled");

    assert!(!result.success);
    assert_eq!(result.plan.status, PlanStatus::Failed);
    assert_eq!(result.step_results.len(), 2);
    assert!(result.step_results[0].success);

    let failed = &result.plan.steps[1];
    assert_eq!(failed.status, StepStatus::Failed);
    let error = failed
        .error_message
        .as_deref()
        .expect("Failed step should carry its error");
    assert!(error.starts_with("File system error"), "{error}");
    assert!(error.contains("disk full"));
    assert_eq!(result.error_message.as_deref(), Some(error));

    assert_eq!(result.plan.steps[2].status, StepStatus::Skipped);
    assert_eq!(result.plan.steps[3].status, StepStatus::Skipped);
    assert_eq!(
        file_system.calls().iter().filter(|call| **call == "move_path").count(),
        1
    );
    assert!(!file_system.calls().contains(&"copy"));
    assert!(root.join("A.cs").exists());
}

#[tokio::test]
async fn test_dry_run_makes_no_mutating_calls_for_any_action() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    write(root, "A.cs", "class A {}");
    write(root, "B.cs", "class B {}");
    write(root, "src/Core/Core.csproj", CORE_PROJECT);
    write(root, "src/Core/Models/Thing.cs", "class Thing {}");
    write(root, "src/Web/Web.csproj", WEB_PROJECT);
    write(root, "src/Old/Old.csproj", CORE_PROJECT);
    write(root, "Widget.cs", "namespace Old.Ns;\n");
    let file_system = Arc::new(RecordingFileSystem::new(false));
    let executor = create_recording_executor(root, true, &file_system).await;

    let steps: Vec<Step> = Action::ALL
        .into_iter()
        .map(|action| match action {
            Action::MoveFile => Step::new(action, "A.cs", "moved/A.cs"),
            Action::CopyFile => Step::new(action, "B.cs", "copied/B.cs"),
            Action::MoveFolder => Step::new(action, "src/Core", "lib/Core"),
            Action::CopyFolder => Step::new(action, "src/Web", "lib/Web"),
            Action::RenameNamespace => Step::new(action, "Widget.cs", "New.Ns")
                .with_metadata(metadata::OLD_NAMESPACE, "Old.Ns"),
            Action::AddProjectReference => {
                Step::new(action, "src/Web/Web.csproj", r"..\Lib\Lib.csproj")
            }
            Action::RemoveProjectReference => {
                Step::new(action, "src/Web/Web.csproj", r"..\Core\Core.csproj")
            }
            Action::UpdateProjectProperty => Step::new(action, "src/Web/Web.csproj", "enable")
                .with_metadata(metadata::PROPERTY_NAME, "Nullable"),
            Action::CreateProject => Step::new(action, "", "src/New/New.csproj"),
            Action::DeleteProject => Step::new(action, "src/Old", ""),
        })
        .collect();
    let result = executor
        .execute(&plan_of(steps), None, &CancellationToken::new())
        .await
        .expect("Execution should not be cancelled");

    assert!(result.success, "{result}");
    assert_eq!(result.step_results.len(), Action::ALL.len());
    assert!(result
        .step_results
        .iter()
        .all(|r| r.message.as_deref().is_some_and(|m| m.starts_with("[DRY RUN]"))));

    let calls = file_system.calls();
    let read_only = ["exists", "is_directory", "read_file", "get_files", "get_directories"];
    assert!(
        calls.iter().all(|call| read_only.contains(call)),
        "unexpected calls: {calls:?}"
    );
    assert_eq!(read(root, "src/Web/Web.csproj"), WEB_PROJECT);
    assert_eq!(read(root, "Widget.cs"), "namespace Old.Ns;\n");
    assert!(root.join("src/Old/Old.csproj").exists());
}

#[tokio::test]
async fn test_move_folder_rejects_file_source() {
    let (temp_dir, executor) = create_test_executor(false).await;
    write(temp_dir.path(), "A.cs", "a");

    let result = executor
        .execute_step(
            &Step::new(Action::MoveFolder, "A.cs", "Folder"),
            &CancellationToken::new(),
        )
        .await
        .expect("Step should not be cancelled");

    assert!(!result.success);
    assert_eq!(result.step.status, StepStatus::Failed);
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.starts_with("Source is not a directory")));
}

#[tokio::test]
async fn test_move_folder_updates_project_references() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "src/Core/Core.csproj", CORE_PROJECT);
    write(root, "src/Core/Widget.cs", "class Widget {}");
    write(root, "src/Web/Web.csproj", WEB_PROJECT);

    let result = executor
        .execute_step(
            &Step::new(Action::MoveFolder, "src/Core", "lib/Core"),
            &CancellationToken::new(),
        )
        .await
        .expect("Step should not be cancelled");

    assert!(result.success, "{:?}", result.error_message);
    assert!(root.join("lib/Core/Widget.cs").exists());
    let web = read(root, "src/Web/Web.csproj");
    assert!(web.contains(r#"Include="..\..\lib\Core\Core.csproj""#), "{web}");
    assert!(!web.contains(r#"..\Core\Core.csproj""#));
    assert!(result
        .message
        .unwrap_or_default()
        .contains("1 project references updated"));
}

#[tokio::test]
async fn test_move_folder_updates_solution_files() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "src/Core/Core.csproj", CORE_PROJECT);
    write(root, "App.sln", APP_SOLUTION);
    write(
        root,
        "build/All.sln",
        &APP_SOLUTION.replace(r"src\", r"..\src\"),
    );
    write(root, "Tools.sln", TOOLS_SOLUTION);

    let result = executor
        .execute_step(
            &Step::new(Action::MoveFolder, "src/Core", "lib/Core"),
            &CancellationToken::new(),
        )
        .await
        .expect("Step should not be cancelled");

    assert!(result.success, "{:?}", result.error_message);
    let app = read(root, "App.sln");
    assert!(app.contains(r#""Core", "lib\Core\Core.csproj""#), "{app}");
    assert!(app.contains(r#""Web", "src\Web\Web.csproj""#));
    let all = read(root, "build/All.sln");
    assert!(all.contains(r#""..\lib\Core\Core.csproj""#), "{all}");
    assert_eq!(read(root, "Tools.sln"), TOOLS_SOLUTION);
    assert!(result
        .message
        .unwrap_or_default()
        .contains("(2 solutions updated, 0 failed)"));
}

#[tokio::test]
async fn test_find_affected_solutions_matches_base_name() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "App.sln", APP_SOLUTION);
    write(root, "Tools.sln", TOOLS_SOLUTION);

    let affected = executor
        .find_affected_solutions(&root.join("src/Core/Core.csproj"), &CancellationToken::new())
        .await
        .expect("Failed to scan workspace");

    assert_eq!(affected, vec![root.join("App.sln")]);
}

#[tokio::test]
async fn test_find_affected_projects_matches_base_name() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "src/Core/Core.csproj", CORE_PROJECT);
    write(root, "src/Web/Web.csproj", WEB_PROJECT);
    write(root, "src/Tools/Tools.csproj", CORE_PROJECT);

    let affected = executor
        .find_affected_projects(&root.join("src/Core/Core.csproj"), &CancellationToken::new())
        .await
        .expect("Failed to scan workspace");

    assert_eq!(affected, vec![root.join("src/Web/Web.csproj")]);
}

#[tokio::test]
async fn test_find_affected_projects_requires_workspace_root() {
    let executor = ExecutorBuilder::new()
        .build()
        .await
        .expect("Failed to create executor");

    let error = executor
        .find_affected_projects(Path::new("Core.csproj"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(error, MigrationError::Configuration { .. }));
}

#[tokio::test]
async fn test_update_references_after_move_forward_slashes() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(
        root,
        "src/Web/Web.csproj",
        &WEB_PROJECT.replace(r"..\Core\Core.csproj", "../Core/Core.csproj"),
    );
    write(root, "src/Other/Other.csproj", "<Project><!-- Core --></Project>");

    let updates = executor
        .update_references_after_move(
            &root.join("src/Core/Core.csproj"),
            &root.join("lib/Core/Core.csproj"),
            &CancellationToken::new(),
        )
        .await
        .expect("Failed to update references");

    assert_eq!(updates.len(), 2);
    let web = updates
        .iter()
        .find(|u| u.file.ends_with("Web.csproj"))
        .expect("Web project should be affected");
    assert_eq!(web.outcome, ReferenceOutcome::Updated);
    let other = updates
        .iter()
        .find(|u| u.file.ends_with("Other.csproj"))
        .expect("Other project should be affected");
    assert_eq!(other.outcome, ReferenceOutcome::Unchanged);
    assert!(read(root, "src/Web/Web.csproj").contains("../../lib/Core/Core.csproj"));
}

#[tokio::test]
async fn test_update_references_skipped_under_dry_run() {
    let (temp_dir, executor) = create_test_executor(true).await;
    let root = temp_dir.path();
    write(root, "src/Web/Web.csproj", WEB_PROJECT);

    let updates = executor
        .update_references_after_move(
            &root.join("src/Core/Core.csproj"),
            &root.join("lib/Core/Core.csproj"),
            &CancellationToken::new(),
        )
        .await
        .expect("Dry run should not fail");

    assert!(updates.is_empty());
    assert_eq!(read(root, "src/Web/Web.csproj"), WEB_PROJECT);
}

#[tokio::test]
async fn test_rename_namespace_rewrites_declarations_and_usings() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(
        root,
        "Widget.cs",
        "using System;\nusing Old.Ns.Sub;\n\nnamespace Old.Ns;\n\npublic class Widget {}\n",
    );

    let step = Step::new(Action::RenameNamespace, "Widget.cs", "New.Ns")
        .with_metadata(metadata::OLD_NAMESPACE, "Old.Ns");
    let result = executor
        .execute_step(&step, &CancellationToken::new())
        .await
        .expect("Step should not be cancelled");

    assert!(result.success);
    let text = read(root, "Widget.cs");
    assert!(text.contains("namespace New.Ns;"));
    assert!(text.contains("using New.Ns.Sub;"));
    assert!(!text.contains("Old.Ns"));
}

#[tokio::test]
async fn test_rename_namespace_without_matches_succeeds() {
    let (temp_dir, executor) = create_test_executor(false).await;
    write(temp_dir.path(), "Widget.cs", "namespace Other;\n");

    let step = Step::new(Action::RenameNamespace, "Widget.cs", "New.Ns")
        .with_metadata(metadata::OLD_NAMESPACE, "Old.Ns");
    let result = executor
        .execute_step(&step, &CancellationToken::new())
        .await
        .expect("Step should not be cancelled");

    assert!(result.success);
    assert!(result.message.unwrap_or_default().starts_with("No changes needed"));
    assert_eq!(read(temp_dir.path(), "Widget.cs"), "namespace Other;\n");
}

#[tokio::test]
async fn test_rename_namespace_requires_old_namespace() {
    let (temp_dir, executor) = create_test_executor(false).await;
    write(temp_dir.path(), "Widget.cs", "namespace Old.Ns;\n");

    let result = executor
        .execute_step(
            &Step::new(Action::RenameNamespace, "Widget.cs", "New.Ns"),
            &CancellationToken::new(),
        )
        .await
        .expect("Step should not be cancelled");

    assert!(!result.success);
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.contains(metadata::OLD_NAMESPACE)));
}

#[tokio::test]
async fn test_project_reference_add_and_remove_are_idempotent() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "src/Api/Api.csproj", CORE_PROJECT);
    let cancel = CancellationToken::new();

    let add = Step::new(
        Action::AddProjectReference,
        "src/Api/Api.csproj",
        r"..\Core\Core.csproj",
    );
    let first = executor.execute_step(&add, &cancel).await.expect("add");
    let second = executor.execute_step(&add, &cancel).await.expect("add again");
    assert!(first.success && second.success);
    assert!(second.message.unwrap_or_default().starts_with("No changes needed"));

    let text = read(root, "src/Api/Api.csproj");
    assert_eq!(text.matches("<ProjectReference").count(), 1);

    let remove = Step::new(
        Action::RemoveProjectReference,
        "src/Api/Api.csproj",
        r"..\Core\Core.csproj",
    );
    let removed = executor.execute_step(&remove, &cancel).await.expect("remove");
    assert!(removed.success);
    let text = read(root, "src/Api/Api.csproj");
    assert!(!text.contains("ProjectReference"));
    assert!(!text.contains("<ItemGroup"));
}

#[tokio::test]
async fn test_update_project_property() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "App.csproj", CORE_PROJECT);
    let cancel = CancellationToken::new();

    let replace = Step::new(Action::UpdateProjectProperty, "App.csproj", "net9.0")
        .with_metadata(metadata::PROPERTY_NAME, "TargetFramework");
    let insert = Step::new(Action::UpdateProjectProperty, "App.csproj", "enable")
        .with_metadata(metadata::PROPERTY_NAME, "Nullable");
    assert!(executor.execute_step(&replace, &cancel).await.expect("replace").success);
    assert!(executor.execute_step(&insert, &cancel).await.expect("insert").success);

    let text = read(root, "App.csproj");
    assert!(text.contains("<TargetFramework>net9.0</TargetFramework>"));
    assert!(text.contains("<Nullable>enable</Nullable>"));
}

#[tokio::test]
async fn test_update_project_property_without_property_group_fails() {
    let (temp_dir, executor) = create_test_executor(false).await;
    write(temp_dir.path(), "App.csproj", "<Project>\n</Project>\n");

    let step = Step::new(Action::UpdateProjectProperty, "App.csproj", "enable")
        .with_metadata(metadata::PROPERTY_NAME, "Nullable");
    let result = executor
        .execute_step(&step, &CancellationToken::new())
        .await
        .expect("Step should not be cancelled");

    assert!(!result.success);
    assert_eq!(
        result.error_message.as_deref(),
        Some("No <PropertyGroup> found in project file")
    );
}

#[tokio::test]
async fn test_create_and_delete_project() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    let cancel = CancellationToken::new();

    let create = Step::new(Action::CreateProject, "", "src/New/New.csproj")
        .with_metadata(metadata::TARGET_FRAMEWORK, "net8.0");
    let created = executor.execute_step(&create, &cancel).await.expect("create");
    assert!(created.success);
    let text = read(root, "src/New/New.csproj");
    assert!(text.contains("Sdk=\"Microsoft.NET.Sdk\""));
    assert!(text.contains("<TargetFramework>net8.0</TargetFramework>"));

    let again = executor.execute_step(&create, &cancel).await.expect("create again");
    assert!(!again.success);

    let delete = Step::new(Action::DeleteProject, "src/New", "");
    let deleted = executor.execute_step(&delete, &cancel).await.expect("delete");
    assert!(deleted.success);
    assert!(!root.join("src/New").exists());
}

#[tokio::test]
async fn test_rollback_plan_reverses_completed_steps() {
    let (_temp_dir, executor) = create_test_executor(false).await;
    let now = jiff::Timestamp::now();
    let plan = plan_of(vec![
        Step::new(Action::MoveFile, "A.cs", "B.cs"),
        Step::new(Action::CopyFile, "C.cs", "D.cs"),
        Step::new(Action::AddProjectReference, "App.csproj", "Lib.csproj"),
        Step::new(Action::CreateProject, "", "New/New.csproj"),
        Step::new(Action::MoveFolder, "src", "lib"),
    ]);
    let executed = Plan {
        steps: vec![
            plan.steps[0].completed(now),
            plan.steps[1].completed(now),
            plan.steps[2].completed(now),
            plan.steps[3].completed(now),
            plan.steps[4].failed("boom", now),
        ],
        status: PlanStatus::Failed,
        ..plan.clone()
    };

    let rollback = executor.rollback_plan(&executed);

    assert_eq!(rollback.name, "Rollback: Test Plan");
    assert_eq!(rollback.status, PlanStatus::Ready);
    assert_ne!(rollback.id, executed.id);
    let summary: Vec<(Action, &str, &str, usize)> = rollback
        .steps
        .iter()
        .map(|s| (s.action, s.source.as_str(), s.target.as_str(), s.index))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Action::DeleteProject, "New/New.csproj", "", 1),
            (Action::RemoveProjectReference, "App.csproj", "Lib.csproj", 2),
            (Action::MoveFile, "B.cs", "A.cs", 3),
        ]
    );
    assert!(rollback.steps.iter().all(|s| s.status == StepStatus::Pending));
    assert_eq!(executed.steps[0].source, "A.cs");
}

#[tokio::test]
async fn test_rollback_moves_file_back() {
    let (temp_dir, executor) = create_test_executor(false).await;
    let root = temp_dir.path();
    write(root, "A.cs", "class A {}");
    let cancel = CancellationToken::new();

    let plan = plan_of(vec![Step::new(Action::MoveFile, "A.cs", "B.cs")]);
    let executed = executor.execute(&plan, None, &cancel).await.expect("execute");
    assert!(executed.success);
    assert!(root.join("B.cs").exists());

    let rolled_back = executor
        .rollback(&executed.plan, None, &cancel)
        .await
        .expect("rollback");

    assert!(rolled_back.success);
    assert_eq!(rolled_back.plan.name, "Rollback: Test Plan");
    assert!(root.join("A.cs").exists());
    assert!(!root.join("B.cs").exists());
    assert_eq!(executed.plan.steps[0].status, StepStatus::Completed);
}

#[tokio::test]
async fn test_progress_reported_before_each_step() {
    let (temp_dir, executor) = create_test_executor(true).await;
    let root = temp_dir.path();
    write(root, "A.cs", "a");
    write(root, "B.cs", "b");

    let plan = plan_of(vec![
        Step::new(Action::MoveFile, "A.cs", "A2.cs"),
        Step::new(Action::MoveFile, "B.cs", "B2.cs"),
    ]);
    let seen = Mutex::new(Vec::new());
    let sink = |progress: &Progress| {
        if let Ok(mut seen) = seen.lock() {
            seen.push(progress.clone());
        }
    };

    executor
        .execute(&plan, Some(&sink), &CancellationToken::new())
        .await
        .expect("execute");

    let seen = seen.into_inner().expect("Progress lock poisoned");
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].step_number, 1);
    assert_eq!(seen[0].percent_complete, 0.0);
    assert_eq!(seen[1].step_number, 2);
    assert_eq!(seen[1].total_steps, 2);
    assert_eq!(seen[1].percent_complete, 50.0);
    assert_eq!(seen[1].message, "Step 2/2: move_file B.cs -> B2.cs");
}

#[tokio::test]
async fn test_cancelled_execution_propagates() {
    let (temp_dir, executor) = create_test_executor(false).await;
    write(temp_dir.path(), "A.cs", "a");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let plan = plan_of(vec![Step::new(Action::MoveFile, "A.cs", "B.cs")]);
    let error = executor.execute(&plan, None, &cancel).await.unwrap_err();

    assert!(error.is_cancelled());
    assert!(temp_dir.path().join("A.cs").exists());
}

#[tokio::test]
async fn test_empty_plan_executes_successfully() {
    let (_temp_dir, executor) = create_test_executor(false).await;
    let result = executor
        .execute(&Plan::new("Empty"), None, &CancellationToken::new())
        .await
        .expect("execute");

    assert!(result.success);
    assert!(result.step_results.is_empty());
    assert_eq!(result.plan.status, PlanStatus::Completed);
}

#[tokio::test]
async fn test_builder_rejects_missing_workspace_root() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let error = ExecutorBuilder::new()
        .with_workspace_root(Some(temp_dir.path().join("missing")))
        .build()
        .await
        .err()
        .expect("Build should fail");

    assert!(matches!(error, MigrationError::Configuration { .. }));
}

#[tokio::test]
async fn test_builder_rejects_invalid_project_pattern() {
    let error = ExecutorBuilder::new()
        .with_project_pattern("*.{csproj")
        .build()
        .await
        .err()
        .expect("Build should fail");

    assert!(matches!(error, MigrationError::InvalidInput { .. }));
}

#[test]
fn test_resolve_path_uses_workspace_root() {
    let executor = Executor::new(
        Arc::new(LocalFileSystem::new()),
        Arc::new(crate::rewrite::RegexNamespaceRewriter),
        ExecutorConfig {
            workspace_root: Some(PathBuf::from("/work")),
            ..ExecutorConfig::default()
        },
    );

    assert_eq!(executor.resolve_path("a/b.cs"), PathBuf::from("/work/a/b.cs"));
    assert_eq!(executor.resolve_path("/abs/b.cs"), PathBuf::from("/abs/b.cs"));
}
