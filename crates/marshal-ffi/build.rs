use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=MARSHAL_HEADER_DIR");

    let config = cbindgen::Config::from_file(PathBuf::from(&crate_dir).join("cbindgen.toml"))
        .expect("failed to read cbindgen.toml");

    let output_dir = env::var_os("MARSHAL_HEADER_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&crate_dir).join("include"));
    std::fs::create_dir_all(&output_dir).expect("failed to create header directory");

    // One declaration set, two host toolchains.
    let targets = [
        (cbindgen::Language::C, "MARSHAL_H", "marshal.h"),
        (cbindgen::Language::Cxx, "MARSHAL_HPP", "marshal.hpp"),
    ];
    for (language, guard, file) in targets {
        let mut config = config.clone();
        config.language = language;
        config.include_guard = Some(guard.to_string());

        match cbindgen::Builder::new()
            .with_crate(&crate_dir)
            .with_config(config)
            .generate()
        {
            Ok(bindings) => {
                bindings.write_to_file(output_dir.join(file));
            }
            Err(e) => println!("cargo:warning=cbindgen could not generate {file}: {e}"),
        }
    }
}
