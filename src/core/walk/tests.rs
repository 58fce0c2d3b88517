use pretty_assertions::assert_eq;

use super::*;
use crate::config::Config;
use crate::core::parsers::parse_source;

fn plan_with(code: &str, path: &str, config: &Config) -> FilePlan {
    let source = parse_source(code.to_string(), path).unwrap();
    plan_file(&source, "", &WalkOptions::from_config(config)).unwrap()
}

fn plan(code: &str) -> FilePlan {
    plan_with(code, "test.tsx", &Config::default())
}

fn texts(plan: &FilePlan) -> Vec<&str> {
    plan.texts().collect()
}

fn slice<'a>(code: &'a str, span: &Range<usize>) -> &'a str {
    &code[span.clone()]
}

#[test]
fn test_plain_literal() {
    let code = "const zh1 = '你好，世界';\n";
    let plan = plan(code);
    assert_eq!(texts(&plan), vec!["你好，世界"]);
    let Rewrite::Literal(candidate) = &plan.rewrites[0] else {
        panic!("expected literal rewrite");
    };
    assert_eq!(slice(code, &candidate.span), "'你好，世界'");
    assert_eq!(candidate.slot, Slot::Standalone);
    assert_eq!(candidate.context.line(), 1);
    assert_eq!(candidate.context.col(), 13);
}

#[test]
fn test_non_cjk_is_skipped() {
    let plan = plan("const a = 'hello';\nconst b = '';\nconst c = `x ${y} z`;\n");
    assert!(plan.rewrites.is_empty());
    assert_eq!(plan.skipped.not_chinese, 4);
}

#[test]
fn test_regex_and_comments_are_never_rewritten() {
    let code = "// 注释\nconst re = /中文/g;\n/* 块注释 */\nconst re2 = new RegExp('中文');\n";
    let plan = plan(code);
    assert!(plan.rewrites.is_empty());
    assert_eq!(plan.skipped.non_translatable, 4);
}

#[test]
fn test_module_specifiers_and_property_keys() {
    let code = r#"import a from './中文';
export * from './导出';
const b = require('./模块');
const c = { '键': 1, ['计算']: 2 };
const d = obj['属性'];
console.log('调试');
"#;
    let plan = plan(code);
    assert!(plan.rewrites.is_empty(), "{:?}", plan.rewrites);
    assert_eq!(plan.skipped.non_translatable, 7);
}

#[test]
fn test_type_positions_are_skipped() {
    let code = r#"type Status = '成功' | '失败';
interface Props { label: '标签' }
enum Color { Red = '红' }
function f(x: '参数'): '返回' { return x; }
"#;
    let plan = plan_with(code, "types.ts", &Config::default());
    assert!(plan.rewrites.is_empty(), "{:?}", plan.rewrites);
    assert_eq!(plan.skipped.non_translatable, 6);
}

#[test]
fn test_already_wrapped_calls() {
    let code = "const a = t('你好');\nconst b = t('home_title');\nconst c = t(`标题`);\n";
    let plan = plan(code);
    assert!(plan.rewrites.is_empty());
    assert_eq!(plan.skipped.already_wrapped, 3);
    assert_eq!(
        plan.wrapped,
        vec![
            WrappedArg {
                text: "你好".to_string(),
                is_text: true
            },
            WrappedArg {
                text: "home_title".to_string(),
                is_text: false
            },
            WrappedArg {
                text: "标题".to_string(),
                is_text: true
            },
        ]
    );
}

#[test]
fn test_translation_call_options_are_wrapped() {
    let code = r#"const a = t('greeting', { defaultValue: '你好', ns: 'common' });
const b = t(key, `默认`);
"#;
    let plan = plan(code);
    assert!(plan.rewrites.is_empty(), "{:?}", plan.rewrites);
    assert_eq!(plan.skipped.already_wrapped, 3);
    assert_eq!(plan.skipped.not_chinese, 1);
    assert_eq!(plan.wrapped.len(), 1);
}

#[test]
fn test_dotted_translation_call() {
    let config = Config {
        translation_call_name: "i18n.t".to_string(),
        ..Default::default()
    };
    let plan = plan_with("const a = i18n.t('你好');\nconst b = t('世界');\n", "a.ts", &config);
    assert_eq!(plan.wrapped.len(), 1);
    // `t` is not the configured call here, so its argument is a plain value
    assert_eq!(texts(&plan), vec!["世界"]);
}

#[test]
fn test_literal_slots() {
    let code = r#"function f(a = '默认') {
  switch (a) {
    case '选项':
      throw new Error('错误');
  }
  throw '失败';
}
const list = ['一', '二'];
const obj = { label: '标签' };
class A { title = '标题'; #secret = '秘密'; }
const x = cond ? '是' : '否';
"#;
    let plan = plan_with(code, "a.ts", &Config::default());
    let slots: Vec<(&str, Slot)> = plan
        .rewrites
        .iter()
        .map(|rewrite| match rewrite {
            Rewrite::Literal(c) => (c.text.as_str(), c.slot),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        slots,
        vec![
            ("默认", Slot::DefaultParam),
            ("选项", Slot::CaseTest),
            ("错误", Slot::Standalone),
            ("失败", Slot::ThrowArgument),
            ("一", Slot::ArrayElement),
            ("二", Slot::ArrayElement),
            ("标签", Slot::ObjectValue),
            ("标题", Slot::FieldInitializer),
            ("秘密", Slot::FieldInitializer),
            ("是", Slot::Standalone),
            ("否", Slot::Standalone),
        ]
    );
}

#[test]
fn test_template_without_interpolation() {
    let code = "const a = `你好`;\n";
    let plan = plan(code);
    let Rewrite::Literal(candidate) = &plan.rewrites[0] else {
        panic!("expected literal rewrite");
    };
    assert_eq!(candidate.kind, CandidateKind::TemplateSegment);
    assert_eq!(slice(code, &candidate.span), "`你好`");
}

#[test]
fn test_template_decomposition() {
    let code = "const msg = `欢迎, 用户${userName}`;\n";
    let plan = plan(code);
    let Rewrite::Template(template) = &plan.rewrites[0] else {
        panic!("expected template rewrite");
    };
    assert_eq!(template.join, Join::Concat);
    assert_eq!(template.slot, Slot::Standalone);
    assert_eq!(slice(code, &template.span), "`欢迎, 用户${userName}`");
    assert_eq!(template.pieces.len(), 3);
    assert_eq!(
        template.pieces[0],
        Piece::Text {
            text: "欢迎, ".to_string(),
            translate: true
        }
    );
    assert_eq!(
        template.pieces[1],
        Piece::Text {
            text: "用户".to_string(),
            translate: true
        }
    );
    let Piece::Interpolation {
        span,
        parenthesize,
        nested,
    } = &template.pieces[2]
    else {
        panic!("expected interpolation");
    };
    assert_eq!(slice(code, span), "userName");
    assert!(!parenthesize);
    assert!(nested.is_empty());
}

#[test]
fn test_template_nested_rewrites_go_to_child_frame() {
    let code = "const s = `共${n}条, ${ok ? '成功' : `失败${code}次`}`;\n";
    let plan = plan(code);
    assert_eq!(plan.rewrites.len(), 1);
    let Rewrite::Template(template) = &plan.rewrites[0] else {
        panic!("expected template rewrite");
    };
    let nested: Vec<&Rewrite> = template
        .pieces
        .iter()
        .filter_map(|piece| match piece {
            Piece::Interpolation {
                nested,
                parenthesize: true,
                ..
            } => Some(nested),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(nested.len(), 2);
    assert!(matches!(nested[0], Rewrite::Literal(c) if c.text == "成功"));
    assert!(matches!(nested[1], Rewrite::Template(_)));
    assert_eq!(texts(&plan), vec!["共", "条, ", "成功", "失败", "次"]);
}

#[test]
fn test_template_operand_slot() {
    let plan = plan("const s = prefix + `你好${name}`;\n");
    let Rewrite::Template(template) = &plan.rewrites[0] else {
        panic!("expected template rewrite");
    };
    assert_eq!(template.slot, Slot::Expression);
}

#[test]
fn test_markup_text_and_attributes() {
    let code = r#"const A = () => (
  <div title="标题" className="类名" alt={'图片'}>
    你好，
    世界
    <span>{name}</span>
  </div>
);
"#;
    let plan = plan(code);
    assert_eq!(plan.rewrites.len(), 3);

    let Rewrite::MarkupAttribute(title) = &plan.rewrites[0] else {
        panic!("expected attribute rewrite");
    };
    assert_eq!(slice(code, &title.span), "\"标题\"");

    let Rewrite::Literal(alt) = &plan.rewrites[1] else {
        panic!("expected literal rewrite");
    };
    assert_eq!(alt.slot, Slot::MarkupAttribute);

    let Rewrite::MarkupText(text) = &plan.rewrites[2] else {
        panic!("expected markup text rewrite");
    };
    assert_eq!(text.text, "你好， 世界");
    assert_eq!(slice(code, &text.span), "你好，\n    世界");
    assert_eq!(plan.skipped.non_translatable, 1);
}

#[test]
fn test_markup_entities_are_decoded() {
    let code = "const A = () => <p title=\"&quot;草稿&quot;\">价格&nbsp;&amp;优惠 &#x4f60;</p>;\n";
    let plan = plan(code);
    assert_eq!(texts(&plan), vec!["\"草稿\"", "价格\u{a0}&优惠 你"]);
    let Rewrite::MarkupText(text) = &plan.rewrites[1] else {
        panic!("expected markup text rewrite");
    };
    assert_eq!(slice(code, &text.span), "价格&nbsp;&amp;优惠 &#x4f60;");
}

#[test]
fn test_markup_child_template_uses_container_span() {
    let code = "const A = () => <p>{`你好${name}`}</p>;\n";
    let plan = plan(code);
    let Rewrite::Template(template) = &plan.rewrites[0] else {
        panic!("expected template rewrite");
    };
    assert_eq!(template.join, Join::MarkupChildren);
    assert_eq!(slice(code, &template.span), "{`你好${name}`}");
}

#[test]
fn test_style_children_are_skipped() {
    let plan = plan("const A = () => <style>{`.a::after { content: '中'; }`}</style>;\n");
    assert!(plan.rewrites.is_empty());
}

#[test]
fn test_unsupported_contexts() {
    let code = "'你好';\nconst q = gql`查询${x}`;\n";
    let plan = plan_with(code, "a.js", &Config::default());
    assert!(plan.rewrites.is_empty());
    let reasons: Vec<&str> = plan.unsupported.iter().map(|u| u.reason).collect();
    assert_eq!(reasons, vec!["expression statement", "tagged template"]);
    assert_eq!(plan.skipped.unsupported, 2);
}

#[test]
fn test_shadowed_callee_is_unsupported() {
    let code = r#"function List({ items }) {
  return items.map((t) => t.name + '个');
}
function Guard() {
  try {
    run();
  } catch (t) {
    return '失败';
  }
  for (const t of rows) {
    show('行');
  }
  return '完成';
}
"#;
    let plan = plan(code);
    assert_eq!(texts(&plan), vec!["完成"]);
    let reasons: Vec<&str> = plan.unsupported.iter().map(|u| u.reason).collect();
    assert_eq!(reasons, vec![SHADOWED_CALLEE; 3]);
    assert_eq!(plan.skipped.unsupported, 3);
}

#[test]
fn test_module_level_shadowed_callee() {
    let plan = plan("const t = Date.now();\nconst a = '你好';\nconst b = <p title=\"标题\">正文</p>;\n");
    assert!(plan.rewrites.is_empty(), "{:?}", plan.rewrites);
    assert_eq!(plan.skipped.unsupported, 3);
    assert_eq!(plan.bindings.callee_binding, Some(CalleeBinding::Foreign));
}

#[test]
fn test_translation_bindings_do_not_shadow() {
    let code = r#"import i18n from 'i18next';
const t = i18n.t.bind(i18n);
function Card({ t: translate }) {
  return '卡片';
}
function Row({ t }) {
  const label = '行';
  return label;
}
"#;
    let plan = plan(code);
    assert_eq!(texts(&plan), vec!["卡片", "行"]);
    assert!(plan.unsupported.is_empty());
}

#[test]
fn test_literal_typed_values_are_skipped() {
    let code = r#"const a = '你好' as const;
const b: '是' | '否' = '是';
const c = { label: '标签' } as const;
const d = x ?? ('好' satisfies '好' | null);
class Form {
  mode: '新建' | '编辑' = '新建';
}
function f(kind: '甲' = '甲') {}
const e = '保留' as string;
"#;
    let plan = plan_with(code, "types.ts", &Config::default());
    assert_eq!(texts(&plan), vec!["保留"]);
    assert!(plan.unsupported.is_empty());
}

#[test]
fn test_whitelist_and_force_include() {
    let config = Config {
        whitelist: vec!["确定".to_string()],
        force_include: vec!["Submit".to_string()],
        ..Default::default()
    };
    let plan = plan_with(
        "const a = '确定';\nconst b = 'Submit';\n",
        "a.ts",
        &config,
    );
    assert_eq!(texts(&plan), vec!["Submit"]);
}

#[test]
fn test_component_scopes() {
    let code = r#"function App() {
  return <div>你好</div>;
}
const Header = memo(() => <h1>标题</h1>);
function helper() {
  return '帮助';
}
function useTitle() {
  const inner = () => '内部';
  return inner;
}
"#;
    let plan = plan(code);
    let names: Vec<&str> = plan.scopes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["App", "Header", "useTitle"]);

    let scopes: Vec<(&str, Option<usize>)> = plan
        .rewrites
        .iter()
        .map(|rewrite| match rewrite {
            Rewrite::Literal(c) | Rewrite::MarkupText(c) => (c.text.as_str(), c.scope),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        scopes,
        vec![
            ("你好", Some(0)),
            ("标题", Some(1)),
            ("帮助", None),
            ("内部", Some(2)),
        ]
    );

    assert!(matches!(plan.scopes[1].anchor, BodyAnchor::Expr { .. }));
    let BodyAnchor::Block {
        after_brace,
        indent,
        inline_first,
    } = &plan.scopes[0].anchor
    else {
        panic!("expected block anchor");
    };
    assert_eq!(*after_brace, "function App() {".len());
    assert_eq!(indent, "  ");
    assert_eq!(*inline_first, None);
}

#[test]
fn test_scope_anchor_for_single_line_body() {
    let code = "  function Body() { return <p>你好</p>; }\n";
    let plan = plan(code);
    let BodyAnchor::Block {
        indent,
        inline_first,
        ..
    } = &plan.scopes[0].anchor
    else {
        panic!("expected block anchor");
    };
    assert_eq!(indent, "    ");
    assert_eq!(*inline_first, code.find("return"));
}

#[test]
fn test_scope_declares_callee() {
    let code = r#"function App() {
  const { t } = useTranslation();
  return <div>你好</div>;
}
function Other({ t }) {
  return <div>世界</div>;
}
"#;
    let plan = plan(code);
    assert_eq!(plan.scopes.len(), 2);
    assert!(plan.scopes.iter().all(|scope| scope.declares_callee));
}

#[test]
fn test_invalid_escape_in_template_fails() {
    let code = "const a = tag`中文\\u{zz}`;\n";
    // Tagged templates may carry invalid escapes; cooked text is missing.
    let source = parse_source(code.to_string(), "a.js").unwrap();
    let err = plan_file(&source, "", &WalkOptions::from_config(&Config::default())).unwrap_err();
    assert!(matches!(err, RewriteError::ParseFailure { .. }));
}

#[test]
fn test_split_segments() {
    assert_eq!(split_segments("欢迎, 用户"), vec!["欢迎, ", "用户"]);
    assert_eq!(split_segments("你好"), vec!["你好"]);
    assert_eq!(split_segments("a,b"), vec!["a,b"]);
    assert_eq!(split_segments("共: "), vec!["共: "]);
    assert!(split_segments("").is_empty());
}

#[test]
fn test_ignored_callee_wildcard() {
    let config = Config {
        ignored_callees: vec!["logger.*".to_string()],
        ..Default::default()
    };
    let plan = plan_with(
        "logger.info('信息');\nconsole.log('调试');\n",
        "a.ts",
        &config,
    );
    assert_eq!(plan.skipped.non_translatable, 1);
    // console.log is no longer ignored: a plain call argument
    assert_eq!(texts(&plan), vec!["调试"]);
}
