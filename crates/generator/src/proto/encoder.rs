//! proto3 text encoder
//!
//! Output is deterministic: messages, enums, services, methods and imports
//! are sorted by name, fields are sorted by name and numbered from 1. Enum
//! values keep their declared order so the zero value stays first.

use idlbridge_common::proto::{
    OptionValue, ProtoEnum, ProtoField, ProtoFile, ProtoMessage, ProtoMethod, ProtoOption,
    ProtoService,
};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Renders a [`ProtoFile`] as proto3 source
pub struct ProtoEncoder;

impl ProtoEncoder {
    pub fn encode(file: &ProtoFile) -> String {
        let mut out = String::new();
        out.push_str("syntax = \"proto3\";\n");

        if !file.package.is_empty() {
            let _ = write!(out, "\npackage {};\n", file.package);
        }

        if !file.imports.is_empty() {
            out.push('\n');
            let mut imports = file.imports.clone();
            imports.sort();
            for import in imports {
                let _ = writeln!(out, "import \"{}\";", escape(&import));
            }
        }

        if !file.options.is_empty() {
            out.push('\n');
            for option in &file.options {
                let _ = writeln!(
                    out,
                    "option {} = {};",
                    option_name(&option.name),
                    render_value(&option.value, 0)
                );
            }
        }

        let mut messages: Vec<&ProtoMessage> = file.messages.iter().collect();
        messages.sort_by(|a, b| a.name.cmp(&b.name));
        for message in messages {
            out.push('\n');
            write_message(&mut out, message, 0);
        }

        let mut enums: Vec<&ProtoEnum> = file.enums.iter().collect();
        enums.sort_by(|a, b| a.name.cmp(&b.name));
        for proto_enum in enums {
            out.push('\n');
            write_enum(&mut out, proto_enum, 0);
        }

        let mut services: Vec<&ProtoService> = file.services.iter().collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        for service in services {
            out.push('\n');
            write_service(&mut out, service);
        }

        out
    }
}

fn write_message(out: &mut String, message: &ProtoMessage, depth: usize) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    let _ = writeln!(out, "{}message {} {{", pad, message.name);

    for option in &message.options {
        let _ = writeln!(
            out,
            "{}option {} = {};",
            inner,
            option_name(&option.name),
            render_value(&option.value, depth + 1)
        );
    }

    let mut enums: Vec<&ProtoEnum> = message.enums.iter().collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));
    for proto_enum in enums {
        write_enum(out, proto_enum, depth + 1);
    }

    let mut nested: Vec<&ProtoMessage> = message.messages.iter().collect();
    nested.sort_by(|a, b| a.name.cmp(&b.name));
    for nested in nested {
        write_message(out, nested, depth + 1);
    }

    let mut fields: Vec<&ProtoField> = message.fields.iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));
    let mut number = 1;
    for field in fields {
        write_field(out, field, number, &inner);
        number += 1;
    }

    let mut oneofs: Vec<_> = message.oneofs.iter().collect();
    oneofs.sort_by(|a, b| a.name.cmp(&b.name));
    for oneof in oneofs {
        let _ = writeln!(out, "{}oneof {} {{", inner, oneof.name);
        let mut fields: Vec<&ProtoField> = oneof.fields.iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        let field_pad = INDENT.repeat(depth + 2);
        for field in fields {
            write_field(out, field, number, &field_pad);
            number += 1;
        }
        let _ = writeln!(out, "{}}}", inner);
    }

    let _ = writeln!(out, "{}}}", pad);
}

fn write_field(out: &mut String, field: &ProtoField, number: usize, pad: &str) {
    let label = if field.repeated { "repeated " } else { "" };
    let _ = write!(out, "{}{}{} {} = {}", pad, label, field.field_type, field.name, number);
    if !field.options.is_empty() {
        let options: Vec<String> = field
            .options
            .iter()
            .map(|o| format!("{} = {}", option_name(&o.name), render_value(&o.value, 0)))
            .collect();
        let _ = write!(out, " [{}]", options.join(", "));
    }
    out.push_str(";\n");
}

fn write_enum(out: &mut String, proto_enum: &ProtoEnum, depth: usize) {
    let pad = INDENT.repeat(depth);
    let _ = writeln!(out, "{}enum {} {{", pad, proto_enum.name);
    for value in &proto_enum.values {
        let _ = writeln!(out, "{}{}{} = {};", pad, INDENT, value.name, value.number);
    }
    let _ = writeln!(out, "{}}}", pad);
}

fn write_service(out: &mut String, service: &ProtoService) {
    let _ = writeln!(out, "service {} {{", service.name);
    for option in &service.options {
        write_option_line(out, option, 1);
    }

    let mut methods: Vec<&ProtoMethod> = service.methods.iter().collect();
    methods.sort_by(|a, b| a.name.cmp(&b.name));
    for method in methods {
        let _ = write!(
            out,
            "{}rpc {}({}) returns ({})",
            INDENT, method.name, method.input_type, method.output_type
        );
        if method.options.is_empty() {
            out.push_str(";\n");
            continue;
        }
        out.push_str(" {\n");
        for option in &method.options {
            write_option_line(out, option, 2);
        }
        let _ = writeln!(out, "{}}}", INDENT);
    }
    out.push_str("}\n");
}

fn write_option_line(out: &mut String, option: &ProtoOption, depth: usize) {
    let _ = writeln!(
        out,
        "{}option {} = {};",
        INDENT.repeat(depth),
        option_name(&option.name),
        render_value(&option.value, depth)
    );
}

/// Custom (dotted) option names are parenthesized
fn option_name(name: &str) -> String {
    if name.contains('.') {
        format!("({})", name)
    } else {
        name.to_string()
    }
}

/// Render an option value; message literals are indented relative to `depth`
fn render_value(value: &OptionValue, depth: usize) -> String {
    match value {
        OptionValue::String(s) => format!("\"{}\"", escape(s)),
        OptionValue::Integer(i) => i.to_string(),
        OptionValue::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                format!("{:.1}", f)
            } else {
                f.to_string()
            }
        },
        OptionValue::Bool(b) => b.to_string(),
        OptionValue::Ident(ident) => ident.clone(),
        OptionValue::List(items) => {
            let items: Vec<String> = items.iter().map(|v| render_value(v, depth)).collect();
            format!("[{}]", items.join(", "))
        },
        OptionValue::Message(fields) => {
            if fields.is_empty() {
                return "{}".to_string();
            }
            let inner = INDENT.repeat(depth + 1);
            let mut rendered = String::from("{\n");
            for (key, value) in fields {
                let _ = writeln!(
                    rendered,
                    "{}{}: {}",
                    inner,
                    key,
                    render_value(value, depth + 1)
                );
            }
            rendered.push_str(&INDENT.repeat(depth));
            rendered.push('}');
            rendered
        },
    }
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
