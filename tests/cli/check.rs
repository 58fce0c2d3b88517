use anyhow::Result;

use crate::{CliTest, stdout};

#[test]
fn test_untranslated_text() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.tsx",
        "export function Button() {\n  return <button>提交</button>;\n}\n",
    )?;

    let output = test.check_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("error: \"提交\"  untranslated"), "{out}");
    assert!(out.contains("--> src/app.tsx:2:18"), "{out}");
    assert!(out.contains("= note: would become {t('ti_jiao')}"), "{out}");
    assert!(out.contains("1 problems (1 error, 0 warnings)"), "{out}");

    // check never writes
    assert_eq!(
        test.read_file("src/app.tsx")?,
        "export function Button() {\n  return <button>提交</button>;\n}\n"
    );
    assert!(!test.root().join("locales").exists());

    Ok(())
}

#[test]
fn test_existing_manifest_keys_are_previewed() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.tsx",
        "export function Button() {\n  return <button>提交</button>;\n}\n",
    )?;
    let manifest = "{\n  \"submit_button\": \"提交\"\n}\n";
    test.write_file("locales/zh-CN.json", manifest)?;

    let output = test.check_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("= note: would become {t('submit_button')}"), "{out}");
    assert_eq!(test.read_file("locales/zh-CN.json")?, manifest);

    Ok(())
}

#[test]
fn test_clean_file() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.tsx",
        "import { t } from 'i18next';\nexport const Button = () => <button>{t('ti_jiao')}</button>;\n",
    )?;

    let output = test.check_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        out.contains("Checked 1 source file - no untranslated text found"),
        "{out}"
    );

    Ok(())
}

#[test]
fn test_unsupported_context_is_a_warning() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "'提示';\n")?;

    let output = test.check_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("warning: \"提示\"  unsupported-context"), "{out}");
    assert!(out.contains("0 errors, 1 warning"), "{out}");

    Ok(())
}

#[test]
fn test_blacklist_and_test_files_are_skipped() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".zhwraprc.json", r#"{ "blacklist": ["src/generated"] }"#)?;
    test.write_file("src/generated/api.ts", "const a = '你好';\n")?;
    test.write_file("src/a.test.ts", "const a = '你好';\n")?;
    test.write_file("src/ok.ts", "const a = 'hello';\n")?;

    let output = test.check_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "{out}");
    assert!(out.contains("Checked 1 source file"), "{out}");

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("wrap"));
    assert!(out.contains("check"));
    assert!(out.contains("init"));

    Ok(())
}
