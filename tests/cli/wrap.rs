use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stdout};

const DIALOG: &str = r#"import React from 'react';

export function Dialog({ onClose }) {
  return (
    <div title="提示">
      确认删除吗？
      <button onClick={onClose}>取消</button>
    </div>
  );
}
"#;

#[test]
fn test_dry_run_previews_and_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/dialog.tsx", DIALOG)?;

    let output = test.wrap_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("--> src/dialog.tsx:5:16"), "{out}");
    assert!(out.contains("= rewrite: \"提示\" -> {t('ti_shi')}"), "{out}");
    assert!(out.contains("Would rewrite 3 literals in 1 file"), "{out}");
    assert!(out.contains("Would add 3 keys to"), "{out}");

    assert_eq!(test.read_file("src/dialog.tsx")?, DIALOG);
    assert!(!test.root().join("locales/zh-CN.json").exists());

    Ok(())
}

#[test]
fn test_apply_rewrites_and_records_keys() -> Result<()> {
    let test = CliTest::with_file("src/dialog.tsx", DIALOG)?;

    let output = test.wrap_command().arg("--apply").output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "{out}");
    assert!(out.contains("Rewrote 3 literals in 1 file"), "{out}");
    assert!(out.contains("Added 3 keys to"), "{out}");

    assert_eq!(
        test.read_file("src/dialog.tsx")?,
        r#"import React from 'react';
import { t } from 'i18next';

export function Dialog({ onClose }) {
  return (
    <div title={t('ti_shi')}>
      {t('que_ren_shan_chu_ma')}
      <button onClick={onClose}>{t('qu_xiao')}</button>
    </div>
  );
}
"#
    );
    assert_eq!(
        test.read_file("locales/zh-CN.json")?,
        "{\n  \"ti_shi\": \"提示\",\n  \"que_ren_shan_chu_ma\": \"确认删除吗？\",\n  \"qu_xiao\": \"取消\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_second_apply_is_a_no_op() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "export const a = '你好';\n")?;

    test.wrap_command().arg("--apply").output()?;
    let rewritten = test.read_file("src/a.ts")?;
    let manifest = test.read_file("locales/zh-CN.json")?;

    let output = test.wrap_command().arg("--apply").output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("Checked 1 source file - nothing to rewrite"), "{out}");
    assert_eq!(test.read_file("src/a.ts")?, rewritten);
    assert_eq!(test.read_file("locales/zh-CN.json")?, manifest);

    Ok(())
}

#[test]
fn test_explicit_paths_and_manifest() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/a.ts", "const a = '保存';\n")?;
    test.write_file("src/b.ts", "const b = '取消';\n")?;

    let output = test
        .wrap_command()
        .args(["--apply", "--manifest", "i18n/zh.json", "src/a.ts"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("src/a.ts")?,
        "import { t } from 'i18next';\nconst a = t('bao_cun');\n"
    );
    assert_eq!(test.read_file("src/b.ts")?, "const b = '取消';\n");
    assert_eq!(
        test.read_file("i18n/zh.json")?,
        "{\n  \"bao_cun\": \"保存\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_config_hook_style() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".zhwraprc.json",
        r#"{
  "importStyle": "hook",
  "keyNamespacePrefix": "app"
}"#,
    )?;
    test.write_file(
        "src/title.tsx",
        "export function Title() {\n  return <h1>标题</h1>;\n}\n",
    )?;

    let output = test.wrap_command().arg("--apply").output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert_eq!(
        test.read_file("src/title.tsx")?,
        "import { useTranslation } from 'react-i18next';\nexport function Title() {\n  const { t } = useTranslation();\n  return <h1>{t('app_biao_ti')}</h1>;\n}\n"
    );

    Ok(())
}

#[test]
fn test_parse_error_is_reported_and_other_files_written() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/bad.ts", "const = '你好';\n")?;
    test.write_file("src/good.ts", "const a = '你好';\n")?;

    let output = test.wrap_command().args(["--apply", "-v"]).output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("parse-error"), "{out}");
    assert!(out.contains("--> src/bad.ts"), "{out}");
    assert_eq!(test.read_file("src/bad.ts")?, "const = '你好';\n");
    assert_eq!(
        test.read_file("src/good.ts")?,
        "import { t } from 'i18next';\nconst a = t('ni_hao');\n"
    );

    Ok(())
}
