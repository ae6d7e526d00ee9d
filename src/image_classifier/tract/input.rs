use crate::image_tensor::tensor::ImageTensor;
use tract_onnx::prelude::*;

/// ImageNet channel statistics used by the MobileNet family.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// `[H, W, 3]` u8 pixels to a normalized `[1, 3, H, W]` f32 tensor.
pub fn image_tensor_to_input(image: &ImageTensor) -> Tensor {
    let (height, width) = (image.height(), image.width());
    let pixels = image.as_slice();

    tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        let value = pixels[(y * width + x) * 3 + c] as f32 / 255.0;
        (value - MEAN[c]) / STD[c]
    })
    .into_tensor()
}
