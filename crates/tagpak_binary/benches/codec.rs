use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_input() -> tagpak_tree::Structure {
    use tagpak_tree::Structure;

    let mut root = Structure::new();
    root.set_string("name", "benchmark").set_i64("seed", 0x5EED);

    let items = (0..500)
        .map(|i| {
            let mut item = Structure::new();
            item.set_i32("identifier", i)
                .set_f32("position_x", i as f32 * 0.5)
                .set_f32("position_y", i as f32 * -0.5)
                .set_string("description", format!("item number {i}"))
                .set_byte_array("payload", vec![i as u8; 16]);
            item
        })
        .collect();
    root.set_list("items", items);
    root
}

pub mod write {
    use divan::Bencher;
    use tagpak_binary::{to_bytes, BinaryWriterOptions, CompressionMethod};

    #[divan::bench]
    fn uncompressed(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|root| {
            divan::black_box(to_bytes(root, BinaryWriterOptions::default()).unwrap());
        });
    }

    #[divan::bench]
    fn without_dictionary(bencher: Bencher) {
        let options = BinaryWriterOptions::builder().use_dictionary(false).build();
        bencher.with_inputs(super::get_input).bench_refs(|root| {
            divan::black_box(to_bytes(root, options).unwrap());
        });
    }

    #[divan::bench]
    fn zlib(bencher: Bencher) {
        let options = BinaryWriterOptions::builder()
            .compression(CompressionMethod::zlib())
            .build();
        bencher.with_inputs(super::get_input).bench_refs(|root| {
            divan::black_box(to_bytes(root, options).unwrap());
        });
    }
}

pub mod read {
    use divan::Bencher;
    use tagpak_binary::{from_bytes, to_bytes, BinaryWriterOptions, CompressionMethod};

    #[divan::bench]
    fn uncompressed(bencher: Bencher) {
        bencher
            .with_inputs(|| to_bytes(&super::get_input(), BinaryWriterOptions::default()).unwrap())
            .bench_refs(|data| {
                divan::black_box(from_bytes(data).unwrap());
            });
    }

    #[divan::bench]
    fn zlib(bencher: Bencher) {
        let options = BinaryWriterOptions::builder()
            .compression(CompressionMethod::zlib())
            .build();
        bencher
            .with_inputs(|| to_bytes(&super::get_input(), options).unwrap())
            .bench_refs(|data| {
                divan::black_box(from_bytes(data).unwrap());
            });
    }
}
