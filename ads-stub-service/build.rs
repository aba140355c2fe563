use std::env::var;
use std::io::Result;

fn main() -> Result<()> {
    // Service definitions pull in their message imports transitively; the
    // errors files are standalone and must be listed explicitly.
    let proto_files = &[
        "proto/adsapi/v1/services.proto",
        "proto/adsapi/v1/errors.proto",
        "proto/adsapi/v2/services.proto",
        "proto/adsapi/v2/errors.proto",
    ];

    // Name of the folder containing the proto definitions
    let proto_folder = "proto";
    let out_dir = var("OUT_DIR").expect("Missing OUT_DIR environment variable");
    let descriptors_path = format!("{}/descriptors.bin", out_dir);

    tonic_prost_build::configure()
        .file_descriptor_set_path(descriptors_path)
        .protoc_arg("--experimental_allow_proto3_optional")
        .build_client(false)
        .compile_protos(proto_files, &[proto_folder])
        .unwrap();

    Ok(())
}
