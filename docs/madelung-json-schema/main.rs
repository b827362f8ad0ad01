use std::path::PathBuf;

use schemars::schema::RootSchema;

use madelung::calculators::{EwaldParameters, DirectParameters};

macro_rules! generate_schema {
    ($name: expr, $Type: ty) => {
        save_schema($name, schemars::schema_for!($Type))
    };
}

fn save_schema(name: &str, mut schema: RootSchema) {
    // name the schema after the calculator instead of the parameters type
    if let Some(metadata) = schema.schema.metadata.as_mut() {
        metadata.title = Some(name.into());
    }

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.push("build");
    path.push("json-schemas");
    std::fs::create_dir_all(&path).expect("failed to create JSON schema directory");

    path.push(format!("{}.json", name));

    let schema = serde_json::to_string_pretty(&schema).expect("failed to create JSON schema");
    std::fs::write(path, schema).expect("failed to save JSON schema to file");
}

fn main() {
    generate_schema!("ewald", EwaldParameters);
    generate_schema!("direct", DirectParameters);
}
