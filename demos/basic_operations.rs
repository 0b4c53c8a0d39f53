use bytes::Bytes;
use ember_kv::{db::Engine, option::Options};

fn main() {
  let mut opts = Options::default();
  opts.dir_path = std::env::temp_dir().join("ember-kv-basic-operations");
  let engine = Engine::open(opts).expect("failed to open ember-kv engine");

  engine
    .put(Bytes::from("name1"), Bytes::from("chenyi"))
    .expect("failed to put name1");
  engine
    .put(Bytes::from("name2"), Bytes::from("zhangjianqi"))
    .expect("failed to put name2");

  let val1 = engine.get(Bytes::from("name1")).expect("failed to get name1");
  let val2 = engine.get(Bytes::from("name2")).expect("failed to get name2");

  println!("val is {}", String::from_utf8_lossy(&val1));
  println!("val is {}", String::from_utf8_lossy(&val2));

  engine
    .delete(Bytes::from("name1"))
    .expect("failed to delete name1");
  engine
    .delete(Bytes::from("name2"))
    .expect("failed to delete name2");
}
