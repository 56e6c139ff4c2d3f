//! Rewrites `schemars` output into the subset accepted by strict structured
//! outputs: closed objects, every property required (optional fields stay
//! nullable), `anyOf` instead of `oneOf`, no `format`/`default` keywords.
//!
//! A `$ref` may not carry sibling keywords in strict mode. Internally tagged
//! enum variants come out of schemars as `{"$ref": ..., "properties": {"type": ...}}`,
//! so such nodes get the referenced definition inlined and merged before the
//! object is closed. `allOf` is flattened the same way.

use serde_json::{Map, Value};

const SCHEMA_MAPS: [&str; 3] = ["properties", "$defs", "definitions"];
const DEFINITION_SECTIONS: [&str; 2] = ["$defs", "definitions"];
const UNSUPPORTED: [&str; 3] = ["$schema", "format", "default"];

pub fn to_strict_schema(mut schema: Value) -> Value {
    let definitions = collect_definitions(&schema);
    rewrite(&mut schema, &definitions);
    schema
}

/// Definitions keyed by their `$ref` pointer, taken before any rewriting
fn collect_definitions(schema: &Value) -> Map<String, Value> {
    let mut definitions = Map::new();
    for section in DEFINITION_SECTIONS {
        if let Some(Value::Object(map)) = schema.get(section) {
            for (name, definition) in map {
                definitions.insert(format!("#/{}/{}", section, name), definition.clone());
            }
        }
    }
    definitions
}

fn rewrite(node: &mut Value, definitions: &Map<String, Value>) {
    let Value::Object(obj) = node else {
        return;
    };

    inline_ref_with_siblings(obj, definitions);
    flatten_all_of(obj, definitions);

    for key in UNSUPPORTED {
        obj.remove(key);
    }
    if let Some(one_of) = obj.remove("oneOf") {
        obj.insert("anyOf".to_string(), one_of);
    }

    let required: Option<Vec<Value>> = match obj.get("properties") {
        Some(Value::Object(props)) => Some(props.keys().cloned().map(Value::String).collect()),
        _ => None,
    };
    if let Some(required) = required {
        obj.insert("required".to_string(), Value::Array(required));
        obj.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    for (key, child) in obj.iter_mut() {
        if SCHEMA_MAPS.contains(&key.as_str()) {
            if let Value::Object(map) = child {
                rewrite_map(map, definitions);
            }
            continue;
        }
        match child {
            Value::Object(_) => rewrite(child, definitions),
            Value::Array(items) => items.iter_mut().for_each(|item| rewrite(item, definitions)),
            _ => {}
        }
    }
}

fn rewrite_map(map: &mut Map<String, Value>, definitions: &Map<String, Value>) {
    for schema in map.values_mut() {
        rewrite(schema, definitions);
    }
}

/// Replace `{"$ref": X, ..siblings}` with the definition of X merged with
/// the siblings. A bare `$ref` is left alone.
fn inline_ref_with_siblings(obj: &mut Map<String, Value>, definitions: &Map<String, Value>) {
    if obj.len() < 2 {
        return;
    }
    let target = match obj.get("$ref") {
        Some(Value::String(target)) => target.clone(),
        _ => return,
    };
    let Some(Value::Object(definition)) = definitions.get(&target) else {
        return;
    };
    obj.remove("$ref");
    merge_into(obj, definition.clone());
}

fn flatten_all_of(obj: &mut Map<String, Value>, definitions: &Map<String, Value>) {
    match obj.remove("allOf") {
        Some(Value::Array(parts)) => {
            for part in parts {
                if let Value::Object(part) = resolve(part, definitions) {
                    merge_into(obj, part);
                }
            }
        }
        Some(other) => {
            obj.insert("allOf".to_string(), other);
        }
        None => {}
    }
}

fn resolve(part: Value, definitions: &Map<String, Value>) -> Value {
    let target = match &part {
        Value::Object(map) if map.len() == 1 => {
            map.get("$ref").and_then(Value::as_str).map(str::to_string)
        }
        _ => None,
    };
    target
        .and_then(|target| definitions.get(&target).cloned())
        .unwrap_or(part)
}

/// Union `properties` and `required`; every other key already on `obj` wins
fn merge_into(obj: &mut Map<String, Value>, other: Map<String, Value>) {
    for (key, value) in other {
        if let Some(existing) = obj.get_mut(&key) {
            match (existing, value) {
                (Value::Object(props), Value::Object(extra)) if key == "properties" => {
                    for (name, schema) in extra {
                        props.entry(name).or_insert(schema);
                    }
                }
                (Value::Array(required), Value::Array(extra)) if key == "required" => {
                    for name in extra {
                        if !required.contains(&name) {
                            required.push(name);
                        }
                    }
                }
                _ => {}
            }
        } else {
            obj.insert(key, value);
        }
    }
}
