use clap::ValueEnum;
use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Side length the model was trained on.
pub const TARGET_SIZE: u32 = 224;

const CAFFE_MEAN_BGR: [f32; 3] = [103.939, 116.779, 123.68];
const TORCH_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const TORCH_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Input normalization expected by the model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Normalization {
    /// VGG mean subtraction with channels left in RGB order, NHWC.
    ///
    /// Same tensor as a BGR-decoded image run through Keras `preprocess_input`,
    /// which flips it back to RGB: channel 0 holds red minus `103.939`.
    Caffe,
    /// VGG / Keras contract on an RGB source: BGR order, mean subtracted, NHWC.
    CaffeBgr,
    /// ImageNet mean/std on [0, 1] values, RGB, NCHW.
    Torch,
}

impl Normalization {
    pub fn input_shape(&self) -> [usize; 4] {
        let size = TARGET_SIZE as usize;
        match self {
            Normalization::Caffe | Normalization::CaffeBgr => [1, size, size, 3],
            Normalization::Torch => [1, 3, size, size],
        }
    }
}

/// Resize to `TARGET_SIZE` x `TARGET_SIZE` and build a single-element batch.
pub fn to_input_tensor(img: &DynamicImage, normalization: Normalization) -> Array4<f32> {
    let resized = img
        .resize_exact(TARGET_SIZE, TARGET_SIZE, FilterType::Triangle)
        .to_rgb8();

    let shape = normalization.input_shape();
    let mut input_tensor = Array4::zeros((shape[0], shape[1], shape[2], shape[3]));

    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        match normalization {
            Normalization::Caffe => {
                for c in 0..3 {
                    input_tensor[[0, y, x, c]] = pixel[c] as f32 - CAFFE_MEAN_BGR[c];
                }
            }
            Normalization::CaffeBgr => {
                // RGB -> BGR
                for c in 0..3 {
                    let value = pixel[2 - c] as f32 - CAFFE_MEAN_BGR[c];
                    input_tensor[[0, y, x, c]] = value;
                }
            }
            Normalization::Torch => {
                for c in 0..3 {
                    let value = (pixel[c] as f32 / 255.0 - TORCH_MEAN[c]) / TORCH_STD[c];
                    input_tensor[[0, c, y, x]] = value;
                }
            }
        }
    }

    input_tensor
}
