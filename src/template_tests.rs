//! Render function output for the supported template syntax.

#[cfg(test)]
mod tests {
    use crate::error::{TEMPLATE_DIRECTIVE_ERROR, TEMPLATE_EXPRESSION_ERROR};
    use crate::template::{compile_template, RenderFunctionCompiler, TemplateCompiler, TemplateInput};

    fn render(source: &str) -> String {
        compile_template(source, "/src/App.vue", "vue").unwrap().code
    }

    /// The expression returned by `render`.
    fn body(source: &str) -> String {
        let code = render(source);
        let start = code.find("return ").map(|i| i + "return ".len()).unwrap();
        let end = code.rfind("\n}").unwrap();
        code[start..end].to_string()
    }

    #[test]
    fn test_render_function_shape() {
        let code = render("<div class=\"box\">{{ msg }}</div>");
        assert_eq!(
            code,
            "import { h as _h, toDisplayString as _toDisplayString } from \"vue\"\n\
             export function render(_ctx, _cache) {\n  \
             return _h(\"div\", { \"class\": \"box\" }, [_toDisplayString(_ctx.msg)])\n}"
        );
    }

    #[test]
    fn test_empty_template_renders_null() {
        assert_eq!(
            render("  \n "),
            "export function render(_ctx, _cache) {\n  return null\n}"
        );
    }

    #[test]
    fn test_multiple_roots_become_fragment() {
        let out = body("<h1>A</h1>\n<p>B</p>");
        assert_eq!(
            out,
            "_h(_Fragment, null, [_h(\"h1\", null, [\"A\"]), _h(\"p\", null, [\"B\"])])"
        );
    }

    #[test]
    fn test_text_with_interpolation_is_condensed() {
        let out = body("<p>\n  Hello   {{ user.name }}!\n</p>");
        assert_eq!(
            out,
            "_h(\"p\", null, [\" Hello \" + _toDisplayString(_ctx.user.name) + \"! \"])"
        );
    }

    #[test]
    fn test_interpolation_with_angle_bracket() {
        let out = body("<span>{{ a < b ? 'x' : 'y' }}</span>");
        assert!(out.contains("_toDisplayString(_ctx.a < _ctx.b ? 'x' : 'y')"));
    }

    #[test]
    fn test_bindings_and_events() {
        let out = body(r#"<button :disabled="busy" @click="save">Go</button>"#);
        assert_eq!(
            out,
            "_h(\"button\", { \"disabled\": _ctx.busy, \"onClick\": _ctx.save }, [\"Go\"])"
        );
    }

    #[test]
    fn test_inline_handler_is_wrapped() {
        let out = body(r#"<button @click="count++">+</button>"#);
        assert!(out.contains("\"onClick\": ($event) => { _ctx.count++ }"));

        let out = body(r#"<input @input="update($event.target.value)">"#);
        assert!(out.contains("($event) => { _ctx.update($event.target.value) }"));
    }

    #[test]
    fn test_arrow_handler_passed_through() {
        let out = body(r#"<button @click="() => remove(id)">x</button>"#);
        assert!(out.contains("\"onClick\": () => _ctx.remove(_ctx.id)"));
    }

    #[test]
    fn test_v_if_chain() {
        let out = body(
            r#"<p v-if="ok">A</p>
               <p v-else-if="maybe">B</p>
               <p v-else>C</p>"#,
        );
        assert_eq!(
            out,
            "(_ctx.ok) ? _h(\"p\", null, [\"A\"]) : (_ctx.maybe) ? _h(\"p\", null, [\"B\"]) : _h(\"p\", null, [\"C\"])"
        );
    }

    #[test]
    fn test_v_if_without_else_falls_back_to_null() {
        assert_eq!(body(r#"<b v-if="show">x</b>"#), "(_ctx.show) ? _h(\"b\", null, [\"x\"]) : null");
    }

    #[test]
    fn test_orphan_v_else_is_error() {
        let err = compile_template("<p v-else>x</p>", "a.vue", "vue").unwrap_err();
        assert_eq!(err.code, TEMPLATE_DIRECTIVE_ERROR);
    }

    #[test]
    fn test_v_for_scopes_aliases() {
        let out = body(r#"<ul><li v-for="(item, i) in items" :key="item.id">{{ i }}: {{ item.label }} {{ suffix }}</li></ul>"#);
        assert!(out.contains("_renderList(_ctx.items, (item, i) => _h(\"li\""));
        assert!(out.contains("\"key\": item.id"));
        assert!(out.contains("_toDisplayString(i)"));
        assert!(out.contains("_toDisplayString(item.label)"));
        assert!(out.contains("_toDisplayString(_ctx.suffix)"));
    }

    #[test]
    fn test_v_for_without_parens() {
        let out = body(r#"<i v-for="n of 3">{{ n }}</i>"#);
        assert!(out.contains("_h(_Fragment, null, _renderList(3, (n) => _h(\"i\", null, [_toDisplayString(n)])))"));
    }

    #[test]
    fn test_components_resolve_with_default_slot() {
        let out = body(r#"<MyCard :title="t"><span>inner</span></MyCard>"#);
        assert_eq!(
            out,
            "_h(_resolveComponent(\"MyCard\"), { \"title\": _ctx.t }, { default: () => [_h(\"span\", null, [\"inner\"])] })"
        );
    }

    #[test]
    fn test_self_closing_component_keeps_siblings() {
        let out = body("<div><Icon name=\"x\" /><span>after</span></div>");
        assert!(out.contains("_h(_resolveComponent(\"Icon\"), { \"name\": \"x\" })"));
        assert!(out.contains(", _h(\"span\", null, [\"after\"])"));
    }

    #[test]
    fn test_self_closing_with_arrow_handler_keeps_siblings() {
        let out = body(r#"<div><Icon @click="() => go()" /><span>after</span></div>"#);
        assert!(out.contains("_h(_resolveComponent(\"Icon\"), { \"onClick\": () => _ctx.go() })"));
        assert!(out.contains(", _h(\"span\", null, [\"after\"])"));
    }

    #[test]
    fn test_camel_case_attribute_names_survive() {
        let out = body(r#"<MyCard :cardTitle="t" @itemSelected="pick"></MyCard>"#);
        assert!(out.contains("{ \"cardTitle\": _ctx.t, \"onItemSelected\": _ctx.pick }"));

        let out = body(r#"<Field @update:modelValue="save" dataKey="k" />"#);
        assert!(out.contains("\"onUpdate:modelValue\": _ctx.save"));
        assert!(out.contains("\"dataKey\": \"k\""));
        assert!(!out.contains("data-sfc-orig-attrs"));
    }

    #[test]
    fn test_slot_outlet() {
        let out = body(r#"<div><slot name="footer">none</slot></div>"#);
        assert!(out.contains("(_ctx.$slots[\"footer\"] ? _ctx.$slots[\"footer\"]() : [\"none\"])"));
    }

    #[test]
    fn test_template_fragment() {
        let out = body(r#"<template v-if="ok"><a>1</a><b>2</b></template>"#);
        assert_eq!(
            out,
            "(_ctx.ok) ? _h(_Fragment, null, [_h(\"a\", null, [\"1\"]), _h(\"b\", null, [\"2\"])]) : null"
        );
    }

    #[test]
    fn test_v_html_and_v_text() {
        assert!(body(r#"<div v-html="raw"></div>"#).contains("innerHTML: _ctx.raw"));
        assert!(body(r#"<div v-text="msg"></div>"#).contains("textContent: _toDisplayString(_ctx.msg)"));
    }

    #[test]
    fn test_svg_attribute_casing() {
        let out = body(r#"<svg viewBox="0 0 10 10"></svg>"#);
        assert!(out.contains("\"viewBox\": \"0 0 10 10\""));
    }

    #[test]
    fn test_unsupported_directive_is_error() {
        let err = compile_template(r#"<input v-model="x">"#, "a.vue", "vue").unwrap_err();
        assert_eq!(err.code, TEMPLATE_DIRECTIVE_ERROR);

        let err = compile_template(r#"<form @submit.prevent="go"></form>"#, "a.vue", "vue").unwrap_err();
        assert_eq!(err.code, TEMPLATE_DIRECTIVE_ERROR);
    }

    #[test]
    fn test_bad_expression_is_error() {
        let err = compile_template("<p>{{ a + }}</p>", "a.vue", "vue").unwrap_err();
        assert_eq!(err.code, TEMPLATE_EXPRESSION_ERROR);
    }

    #[test]
    fn test_runtime_module_is_configurable() {
        let compiler = RenderFunctionCompiler::new("@my/runtime");
        let out = compiler
            .compile(&TemplateInput {
                source: "<p>x</p>",
                filename: "a.vue",
                id: "data-v-1",
            })
            .unwrap();
        assert!(out.code.starts_with("import { h as _h } from \"@my/runtime\""));
    }
}
