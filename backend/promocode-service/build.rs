fn main() {
    // Service stubs for promocode.v1.Promocodes
    // Messages are plain prost structs in src/grpc/messages.rs, so no protoc is needed
    println!("cargo:rerun-if-changed=build.rs");

    let unary = |name: &str, route: &str, input: &str, output: &str| {
        tonic_build::manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type(format!("crate::grpc::messages::{input}"))
            .output_type(format!("crate::grpc::messages::{output}"))
            .codec_path("tonic::codec::ProstCodec")
            .build()
    };

    let service = tonic_build::manual::Service::builder()
        .name("Promocodes")
        .package("promocode.v1")
        .method(unary(
            "create_promocode",
            "CreatePromocode",
            "CreatePromocodeRequest",
            "PromocodeResponse",
        ))
        .method(unary(
            "get_promocode",
            "GetPromocode",
            "GetPromocodeRequest",
            "PromocodeResponse",
        ))
        .method(unary(
            "update_promocode",
            "UpdatePromocode",
            "UpdatePromocodeRequest",
            "PromocodeResponse",
        ))
        .method(unary(
            "delete_promocode",
            "DeletePromocode",
            "DeletePromocodeRequest",
            "PromocodeResponse",
        ))
        .method(unary(
            "list_promocodes",
            "ListPromocodes",
            "ListPromocodesRequest",
            "ListPromocodesResponse",
        ))
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
